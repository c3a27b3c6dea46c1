//! An in-process FMU implementing the FMI 2.0 instance traits, used to exercise the master
//! algorithms without loading a shared library.

use fmi::{
    fmi2::{
        binding,
        instance::{CoSimulation, Common, ModelExchange},
        schema::Fmi2ModelDescription,
        Fmi2Error, Fmi2Res,
    },
    traits::FmiInstance,
    EventFlags, InterfaceType,
};

const G: f64 = 9.81;

/// A point mass `body1` falling from `body1.frame_a.r_0[2]`.
///
/// Value references follow `fmi-schema/tests/FMI2.xml`.
pub struct FallingBody {
    md: Fmi2ModelDescription,
    interface_type: InterfaceType,
    pub calls: Vec<&'static str>,
    pub time: f64,
    /// Height and vertical velocity
    pub x: [f64; 2],
    pub mass: f64,
    pub h0: f64,
    /// Co-Simulation: discard and terminate the step that would reach the ground
    pub stop_at_ground: bool,
    /// Model-Exchange: bounce with this restitution when reaching the ground
    pub restitution: f64,
    /// Model-Exchange: time event announced after initialization
    pub time_event: Option<f64>,
    pub time_events_handled: usize,
    last_successful_time: f64,
    terminated: bool,
}

impl FallingBody {
    pub fn new(interface_type: InterfaceType) -> Self {
        let md = Fmi2ModelDescription::deserialize(include_str!(
            "../../../fmi-schema/tests/FMI2.xml"
        ))
        .expect("valid model description");
        Self {
            md,
            interface_type,
            calls: vec![],
            time: 0.0,
            x: [0.0; 2],
            mass: 1.0,
            h0: 0.5,
            stop_at_ground: false,
            restitution: 0.8,
            time_event: None,
            time_events_handled: 0,
            last_successful_time: 0.0,
            terminated: false,
        }
    }

    fn height_at(&self, time: f64) -> f64 {
        self.h0 - 0.5 * G * time * time
    }

    fn real(&self, vr: u32) -> Result<f64, Fmi2Error> {
        match vr {
            0 | 2 => Ok(0.0),
            1 => Ok(self.x[0]),
            3 | 4 => Ok(self.x[1]),
            5 => Ok(-G),
            6 => Ok(self.mass),
            7 => Ok(self.h0),
            _ => Err(Fmi2Error::Error),
        }
    }
}

impl FmiInstance for FallingBody {
    type ModelDescription = Fmi2ModelDescription;
    type ValueRef = binding::fmi2ValueReference;

    fn name(&self) -> &str {
        "falling_body"
    }

    fn interface_type(&self) -> InterfaceType {
        self.interface_type
    }

    fn model_description(&self) -> &Self::ModelDescription {
        &self.md
    }
}

impl Common for FallingBody {
    fn setup_experiment(
        &mut self,
        _tolerance: Option<f64>,
        start_time: f64,
        _stop_time: Option<f64>,
    ) -> Result<Fmi2Res, Fmi2Error> {
        self.calls.push("setup_experiment");
        self.time = start_time;
        Ok(Fmi2Res::OK)
    }

    fn enter_initialization_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        self.calls.push("enter_initialization_mode");
        Ok(Fmi2Res::OK)
    }

    fn exit_initialization_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        self.calls.push("exit_initialization_mode");
        self.x = [self.height_at(self.time), -G * self.time];
        Ok(Fmi2Res::OK)
    }

    fn terminate(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        self.calls.push("terminate");
        Ok(Fmi2Res::OK)
    }

    fn get_real(&mut self, vrs: &[u32], values: &mut [f64]) -> Result<Fmi2Res, Fmi2Error> {
        for (vr, value) in vrs.iter().zip(values) {
            *value = self.real(*vr)?;
        }
        Ok(Fmi2Res::OK)
    }

    fn get_integer(&mut self, _: &[u32], _: &mut [i32]) -> Result<Fmi2Res, Fmi2Error> {
        Err(Fmi2Error::Error)
    }

    fn get_boolean(&mut self, vrs: &[u32], values: &mut [i32]) -> Result<Fmi2Res, Fmi2Error> {
        for (vr, value) in vrs.iter().zip(values) {
            match vr {
                8 => *value = binding::fmi2True,
                _ => return Err(Fmi2Error::Error),
            }
        }
        Ok(Fmi2Res::OK)
    }

    fn get_string(&mut self, _: &[u32]) -> Result<Vec<String>, Fmi2Error> {
        Err(Fmi2Error::Error)
    }

    fn set_real(&mut self, vrs: &[u32], values: &[f64]) -> Result<Fmi2Res, Fmi2Error> {
        self.calls.push("set_real");
        for (vr, value) in vrs.iter().zip(values) {
            match vr {
                6 => self.mass = *value,
                7 => self.h0 = *value,
                _ => return Err(Fmi2Error::Error),
            }
        }
        Ok(Fmi2Res::OK)
    }

    fn set_integer(&mut self, _: &[u32], _: &[i32]) -> Result<Fmi2Res, Fmi2Error> {
        Err(Fmi2Error::Error)
    }

    fn set_boolean(&mut self, vrs: &[u32], _: &[i32]) -> Result<Fmi2Res, Fmi2Error> {
        if vrs.iter().all(|vr| *vr == 8) {
            Ok(Fmi2Res::OK)
        } else {
            Err(Fmi2Error::Error)
        }
    }

    fn set_string(&mut self, _: &[u32], _: &[&str]) -> Result<Fmi2Res, Fmi2Error> {
        Err(Fmi2Error::Error)
    }
}

impl CoSimulation for FallingBody {
    fn do_step(
        &mut self,
        current_communication_point: f64,
        communication_step_size: f64,
        _new_step: bool,
    ) -> Result<Fmi2Res, Fmi2Error> {
        let time = current_communication_point + communication_step_size;
        if self.stop_at_ground && self.height_at(time) < 0.0 {
            self.last_successful_time = current_communication_point;
            self.terminated = true;
            return Err(Fmi2Error::Discard);
        }
        self.time = time;
        self.x = [self.height_at(time), -G * time];
        self.last_successful_time = time;
        Ok(Fmi2Res::OK)
    }

    fn last_successful_time(&mut self) -> Result<f64, Fmi2Error> {
        Ok(self.last_successful_time)
    }

    fn terminated(&mut self) -> Result<bool, Fmi2Error> {
        Ok(self.terminated)
    }
}

impl ModelExchange for FallingBody {
    fn enter_event_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        self.calls.push("enter_event_mode");
        Ok(Fmi2Res::OK)
    }

    fn new_discrete_states(&mut self, event_flags: &mut EventFlags) -> Result<Fmi2Res, Fmi2Error> {
        event_flags.reset();

        if self.x[0] <= 0.0 && self.x[1] < 0.0 {
            self.x = [self.x[0].abs().max(f64::EPSILON), -self.restitution * self.x[1]];
            event_flags.values_of_continuous_states_changed = true;
        }

        match self.time_event {
            Some(event_time) if self.time >= event_time => {
                self.time_events_handled += 1;
                self.time_event = None;
            }
            Some(event_time) => event_flags.next_event_time = Some(event_time),
            None => {}
        }

        Ok(Fmi2Res::OK)
    }

    fn enter_continuous_time_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Ok(Fmi2Res::OK)
    }

    fn completed_integrator_step(&mut self, _: bool) -> Result<(bool, bool), Fmi2Error> {
        Ok((false, false))
    }

    fn set_time(&mut self, time: f64) -> Result<Fmi2Res, Fmi2Error> {
        self.time = time;
        Ok(Fmi2Res::OK)
    }

    fn set_continuous_states(&mut self, states: &[f64]) -> Result<Fmi2Res, Fmi2Error> {
        self.x.copy_from_slice(states);
        Ok(Fmi2Res::OK)
    }

    fn get_derivatives(&mut self, dx: &mut [f64]) -> Result<Fmi2Res, Fmi2Error> {
        dx.copy_from_slice(&[self.x[1], -G]);
        Ok(Fmi2Res::OK)
    }

    fn get_event_indicators(&mut self, events: &mut [f64]) -> Result<Fmi2Res, Fmi2Error> {
        if let Some(z) = events.first_mut() {
            *z = self.x[0];
        }
        Ok(Fmi2Res::OK)
    }

    fn get_continuous_states(&mut self, x: &mut [f64]) -> Result<Fmi2Res, Fmi2Error> {
        x.copy_from_slice(&self.x);
        Ok(Fmi2Res::OK)
    }
}
