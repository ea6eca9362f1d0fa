//! The demo object graph: a telemetry hub with named sensors.
//!
//! Stands in for the host application. Registers one schema per type,
//! an input handler that resolves sensors by name through the caller
//! context, and output handlers for the two object types.

use std::sync::Arc;

use parking_lot::Mutex;
use scry_core::{
    Inspector, InvocationContext, ObjectType, TypeKey, TypeSchema, Value,
};

pub struct Hub {
    name: String,
    sensors: Vec<Arc<Sensor>>,
}

pub struct Sensor {
    name: String,
    readings: Mutex<Vec<f64>>,
}

impl Sensor {
    fn new(name: &str, readings: &[f64]) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            readings: Mutex::new(readings.to_vec()),
        })
    }

    fn average(&self) -> f64 {
        let readings = self.readings.lock();
        if readings.is_empty() {
            0.0
        } else {
            readings.iter().sum::<f64>() / readings.len() as f64
        }
    }
}

pub fn hub_ty() -> ObjectType {
    ObjectType::of::<Hub>("Hub")
}

pub fn sensor_ty() -> ObjectType {
    ObjectType::of::<Sensor>("Sensor")
}

/// Caller context for the REPL: resolves sensor names against the hub.
pub struct HubContext {
    hub: Arc<Hub>,
}

impl InvocationContext for HubContext {
    fn resolve_name(&self, name: &str) -> Option<Value> {
        self.hub
            .sensors
            .iter()
            .find(|sensor| sensor.name == name)
            .map(|sensor| Value::object_arc(sensor_ty(), Arc::clone(sensor)))
    }
}

fn hub_schema() -> TypeSchema {
    TypeSchema::new::<Hub>("Hub")
        .method("get_name", [], TypeKey::Str, |recv, _args| {
            let hub: &Hub = recv.downcast_ref().ok_or("expected a Hub")?;
            Ok(Value::Str(hub.name.clone()))
        })
        .method(
            "get_sensors",
            [],
            TypeKey::list(TypeKey::Object(sensor_ty())),
            |recv, _args| {
                let hub: &Hub = recv.downcast_ref().ok_or("expected a Hub")?;
                Ok(Value::List(
                    hub.sensors
                        .iter()
                        .map(|sensor| Value::object_arc(sensor_ty(), Arc::clone(sensor)))
                        .collect(),
                ))
            },
        )
        .method(
            "get_sensor",
            [TypeKey::Str],
            TypeKey::Object(sensor_ty()),
            |recv, args| {
                let hub: &Hub = recv.downcast_ref().ok_or("expected a Hub")?;
                let name = args[0].as_str().ok_or("expected a sensor name")?;
                Ok(hub
                    .sensors
                    .iter()
                    .find(|sensor| sensor.name == name)
                    .map(|sensor| Value::object_arc(sensor_ty(), Arc::clone(sensor)))
                    .unwrap_or(Value::Null))
            },
        )
        .method("sensor_count", [], TypeKey::Int, |recv, _args| {
            let hub: &Hub = recv.downcast_ref().ok_or("expected a Hub")?;
            Ok(Value::Int(hub.sensors.len() as i64))
        })
}

fn sensor_schema() -> TypeSchema {
    TypeSchema::new::<Sensor>("Sensor")
        .method("get_name", [], TypeKey::Str, |recv, _args| {
            let sensor: &Sensor = recv.downcast_ref().ok_or("expected a Sensor")?;
            Ok(Value::Str(sensor.name.clone()))
        })
        .method(
            "get_readings",
            [],
            TypeKey::list(TypeKey::Float),
            |recv, _args| {
                let sensor: &Sensor = recv.downcast_ref().ok_or("expected a Sensor")?;
                Ok(Value::List(
                    sensor
                        .readings
                        .lock()
                        .iter()
                        .map(|r| Value::Float(*r))
                        .collect(),
                ))
            },
        )
        .method("last", [], TypeKey::Float, |recv, _args| {
            let sensor: &Sensor = recv.downcast_ref().ok_or("expected a Sensor")?;
            Ok(sensor
                .readings
                .lock()
                .last()
                .map(|r| Value::Float(*r))
                .unwrap_or(Value::Null))
        })
        .method("record", [TypeKey::Float], TypeKey::Float, |recv, args| {
            let sensor: &Sensor = recv.downcast_ref().ok_or("expected a Sensor")?;
            let reading = args[0].as_float().ok_or("expected a reading")?;
            if !reading.is_finite() {
                return Err(format!("refusing to record a non-finite reading: {reading}"));
            }
            sensor.readings.lock().push(reading);
            Ok(Value::Float(reading))
        })
        .method("is_noisy", [], TypeKey::Bool, |recv, _args| {
            let sensor: &Sensor = recv.downcast_ref().ok_or("expected a Sensor")?;
            let readings = sensor.readings.lock();
            let spread = if readings.is_empty() {
                0.0
            } else {
                let min = readings.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = readings.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                max - min
            };
            Ok(Value::Bool(spread > 1.0))
        })
        .method(
            "diff",
            [TypeKey::Object(sensor_ty())],
            TypeKey::Float,
            |recv, args| {
                let sensor: &Sensor = recv.downcast_ref().ok_or("expected a Sensor")?;
                let other: &Sensor = args[0].downcast_ref().ok_or("expected a Sensor")?;
                Ok(Value::Float(sensor.average() - other.average()))
            },
        )
}

/// Build the inspector and the demo graph it walks.
pub fn build() -> anyhow::Result<(Inspector, Value, TypeKey, HubContext)> {
    let hub = Arc::new(Hub {
        name: "observatory".to_string(),
        sensors: vec![
            Sensor::new("thermal", &[20.6, 21.0, 20.8]),
            Sensor::new("pressure", &[101.2, 101.3]),
            Sensor::new("vibration", &[0.1, 2.4, 0.3]),
        ],
    });

    let inspector = Inspector::builder()
        .schema(hub_schema())
        .schema(sensor_schema())
        .input_handler(TypeKey::Object(sensor_ty()), |text, ctx| {
            ctx.resolve_name(text)
                .ok_or_else(|| format!("no sensor named '{text}'"))
        })
        .output_handler(TypeKey::Object(sensor_ty()), |value| {
            match value.downcast_ref::<Sensor>() {
                Some(sensor) => {
                    format!("{} ({} readings)", sensor.name, sensor.readings.lock().len())
                }
                None => "<Sensor>".to_string(),
            }
        })
        .output_handler(TypeKey::Object(hub_ty()), |value| {
            match value.downcast_ref::<Hub>() {
                Some(hub) => format!("hub '{}' with {} sensors", hub.name, hub.sensors.len()),
                None => "<Hub>".to_string(),
            }
        })
        .build()?;

    let root = Value::object_arc(hub_ty(), Arc::clone(&hub));
    let context = HubContext { hub };
    Ok((inspector, root, TypeKey::Object(hub_ty()), context))
}
