//! Mock simulation feed
//!
//! There is no circuit solver. While simulation mode is on, a timer produces
//! plausible-looking readings: a supply voltage/current/power triple and one
//! display string per probe on the canvas. The editor only displays these.
//!
//! Probes are the meters plus the sensor modules an ESP32 would sample:
//!
//! | part      | ADC pin | output                                   |
//! |-----------|---------|------------------------------------------|
//! | ZMPT101B  | GPIO34  | `1.5 + 0.006 * v_mains`                  |
//! | ACS712    | GPIO35  | `Vcc/2 + 0.066 * i_supply`               |
//! | NTC       | GPIO32  | `1.65 + 0.01 * (T - 25)`, T ramps slowly |
//! | piezo     | GPIO33  | low-pass envelope of random taps         |
//! | relay     | GPIO26  | drive sense, high when the coil is wired |
//!
//! Analog outputs are clamped to the 0..3.3 V ADC range.
//!
//! [`SimulationDriver::spawn`] runs the timer as a tokio task and hands back a
//! [`SimulationHandle`]. Dropping the handle (or calling
//! [`SimulationHandle::stop`]) aborts the task, so the timer never outlives
//! the editor that started it.

use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::catalog::ComponentKind;
use crate::diagram::{ComponentId, Diagram};

/// Component id to display string, e.g. `"4.98V"` or `"21mA"`
pub type MeasurementMap = BTreeMap<ComponentId, String>;

const ADC_VCC: f64 = 3.3;
const MAINS_PEAK: f64 = 325.0;
const ZMPT_OFFSET: f64 = 1.5;
const ZMPT_GAIN: f64 = 0.006;
/// ACS712-30A sensitivity, volts per ampere
const ACS712_SENSITIVITY: f64 = 0.066;
const NTC_START_TEMP: f64 = 30.0;
const NTC_RAMP: f64 = 0.01;
const PIEZO_ALPHA: f64 = 0.05;
const SENSOR_NOISE: f64 = 0.01;

/// Supply readings shown in the status area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    /// Volts
    pub voltage: f64,
    /// Amperes
    pub current: f64,
    /// Watts
    pub power: f64,
}

/// One timer tick worth of fake data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationTick {
    pub readings: Readings,
    pub measurements: MeasurementMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Voltmeter,
    Ammeter,
    VoltageSensor,
    CurrentSensor,
    Thermistor,
    Piezo,
    RelayDrive { energized: bool },
}

/// Something on the canvas that receives a measurement string each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub component_id: ComponentId,
    pub kind: ProbeKind,
}

/// ESP32 ADC pin a sensor module is read on, `None` for other parts
pub fn adc_channel(kind: &ComponentKind) -> Option<&'static str> {
    match kind {
        ComponentKind::Zmpt101b => Some("GPIO34"),
        ComponentKind::Acs712 => Some("GPIO35"),
        ComponentKind::Thermistor => Some("GPIO32"),
        ComponentKind::Piezo => Some("GPIO33"),
        ComponentKind::Relay => Some("GPIO26"),
        _ => None,
    }
}

/// Meters and sensors currently placed in a diagram, in draw order
pub fn probes(diagram: &Diagram) -> Vec<Probe> {
    let wired = |id: ComponentId, pin: &str| {
        diagram.wires().iter().any(|w| {
            (w.from.component_id == id && w.from.pin_id == pin)
                || (w.to.component_id == id && w.to.pin_id == pin)
        })
    };

    diagram
        .components()
        .iter()
        .filter_map(|c| {
            let kind = match c.kind {
                ComponentKind::Voltmeter => ProbeKind::Voltmeter,
                ComponentKind::Ammeter => ProbeKind::Ammeter,
                ComponentKind::Zmpt101b => ProbeKind::VoltageSensor,
                ComponentKind::Acs712 => ProbeKind::CurrentSensor,
                ComponentKind::Thermistor => ProbeKind::Thermistor,
                ComponentKind::Piezo => ProbeKind::Piezo,
                ComponentKind::Relay => ProbeKind::RelayDrive {
                    energized: wired(c.id, "coil+") && wired(c.id, "coil-"),
                },
                _ => return None,
            };
            Some(Probe {
                component_id: c.id,
                kind,
            })
        })
        .collect()
}

/// Anything that can produce ticks
pub trait MeasurementSource: Send {
    fn tick(&mut self, probes: &[Probe]) -> SimulationTick;
}

/// Random readings around a 5 V / 20 mA operating point, with the sensor
/// modules driven through their transfer functions
pub struct MockSimulator {
    rng: StdRng,
    step: Duration,
    elapsed: Duration,
    /// Envelope follower state per piezo
    envelopes: BTreeMap<ComponentId, f64>,
}

impl MockSimulator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            step: Duration::from_millis(100),
            elapsed: Duration::ZERO,
            envelopes: BTreeMap::new(),
        }
    }

    /// Simulated time that passes per tick. Drives the thermistor ramp.
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    fn noise(&mut self, amplitude: f64) -> f64 {
        self.rng.random_range(-amplitude..amplitude)
    }

    fn measure(&mut self, probe: &Probe, readings: &Readings) -> String {
        match probe.kind {
            ProbeKind::Voltmeter => {
                let v = readings.voltage + self.noise(0.05);
                format_volts(v)
            }
            ProbeKind::Ammeter => {
                let ma = readings.current * 1000.0 + self.noise(1.0);
                format_milliamps(ma)
            }
            ProbeKind::VoltageSensor => {
                // mains is sampled at an arbitrary phase each tick
                let phase = self.rng.random_range(0.0..TAU);
                let mains = MAINS_PEAK * phase.sin();
                let out = ZMPT_OFFSET + ZMPT_GAIN * mains + self.noise(SENSOR_NOISE);
                format_volts(adc_clamp(out))
            }
            ProbeKind::CurrentSensor => {
                let out =
                    ADC_VCC / 2.0 + ACS712_SENSITIVITY * readings.current + self.noise(SENSOR_NOISE);
                format_volts(adc_clamp(out))
            }
            ProbeKind::Thermistor => {
                let temp = NTC_START_TEMP + NTC_RAMP * self.elapsed.as_secs_f64();
                format_volts(adc_clamp(ntc_divider_volts(temp)))
            }
            ProbeKind::Piezo => {
                let tap = self.noise(1.0).abs();
                let prev = self.envelopes.get(&probe.component_id).copied().unwrap_or(0.0);
                let env = PIEZO_ALPHA * tap + (1.0 - PIEZO_ALPHA) * prev;
                self.envelopes.insert(probe.component_id, env);
                let out = env + self.noise(SENSOR_NOISE / 2.0);
                format_volts(adc_clamp(out))
            }
            ProbeKind::RelayDrive { energized } => {
                let level = if energized { "HIGH" } else { "LOW" };
                level.to_string()
            }
        }
    }
}

impl MeasurementSource for MockSimulator {
    fn tick(&mut self, probes: &[Probe]) -> SimulationTick {
        let voltage = 5.0 + self.noise(0.25);
        let current = 0.020 + self.noise(0.005);
        let readings = Readings {
            voltage,
            current,
            power: voltage * current,
        };

        self.envelopes
            .retain(|id, _| probes.iter().any(|p| p.component_id == *id));

        let mut measurements = MeasurementMap::new();
        for probe in probes {
            let text = self.measure(probe, &readings);
            measurements.insert(probe.component_id, text);
        }
        self.elapsed += self.step;

        SimulationTick {
            readings,
            measurements,
        }
    }
}

/// NTC divider output for a temperature in degrees Celsius
pub fn ntc_divider_volts(celsius: f64) -> f64 {
    1.65 + (celsius - 25.0) * 0.01
}

fn adc_clamp(volts: f64) -> f64 {
    volts.clamp(0.0, ADC_VCC)
}

/// Two decimals with a `V` suffix
pub fn format_volts(volts: f64) -> String {
    format!("{:.2}V", volts)
}

/// Rounded integer with an `mA` suffix
pub fn format_milliamps(milliamps: f64) -> String {
    format!("{}mA", milliamps.round() as i64)
}

/// One row of the per-timestamp sensor log: seconds since start plus one
/// column per ADC channel. A relay drive reads 1.0 or 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRow {
    pub time: f64,
    #[serde(flatten)]
    pub channels: BTreeMap<String, Option<f64>>,
}

/// Align collected ticks into log rows keyed by ADC channel.
///
/// A second sensor on an already used channel gets the column
/// `<channel>_<id>`. A sensor without a reading in some tick logs `null`.
pub fn sensor_log(diagram: &Diagram, ticks: &[SimulationTick], step: Duration) -> Vec<LogRow> {
    let mut columns: Vec<(String, ComponentId)> = Vec::new();
    for component in diagram.components() {
        let Some(channel) = adc_channel(&component.kind) else {
            continue;
        };
        let name = if columns.iter().any(|(n, _)| n == channel) {
            format!("{}_{}", channel, component.id)
        } else {
            channel.to_string()
        };
        columns.push((name, component.id));
    }

    ticks
        .iter()
        .enumerate()
        .map(|(i, tick)| LogRow {
            time: step.as_secs_f64() * i as f64,
            channels: columns
                .iter()
                .map(|(name, id)| {
                    let value = tick.measurements.get(id).and_then(|t| reading_value(t));
                    (name.clone(), value)
                })
                .collect(),
        })
        .collect()
}

fn reading_value(text: &str) -> Option<f64> {
    match text {
        "HIGH" => Some(1.0),
        "LOW" => Some(0.0),
        _ => text.strip_suffix('V')?.parse().ok(),
    }
}

/// Spawns the periodic tick task
pub struct SimulationDriver;

impl SimulationDriver {
    /// Start ticking every `period`. Must be called inside a tokio runtime.
    pub fn spawn<S>(mut source: S, probes: Vec<Probe>, period: Duration) -> SimulationHandle
    where
        S: MeasurementSource + 'static,
    {
        let (tick_tx, tick_rx) = mpsc::channel(16);
        let (probe_tx, mut probe_rx) = watch::channel(probes);

        info!("Starting mock simulation, period {:?}", period);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let probes = probe_rx.borrow_and_update().clone();
                let tick = source.tick(&probes);
                if tick_tx.send(tick).await.is_err() {
                    debug!("Tick receiver dropped, stopping simulation task");
                    break;
                }
            }
        });

        SimulationHandle {
            task,
            ticks: tick_rx,
            probes: probe_tx,
        }
    }
}

/// Owner of a running simulation timer
pub struct SimulationHandle {
    task: JoinHandle<()>,
    ticks: mpsc::Receiver<SimulationTick>,
    probes: watch::Sender<Vec<Probe>>,
}

impl SimulationHandle {
    /// Wait for the next tick. `None` once the task has stopped.
    pub async fn next_tick(&mut self) -> Option<SimulationTick> {
        self.ticks.recv().await
    }

    /// Replace the meters that receive measurements, e.g. after an edit
    pub fn set_probes(&self, probes: Vec<Probe>) {
        self.probes.send_replace(probes);
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the timer. Equivalent to dropping the handle.
    pub fn stop(self) {}
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.task.abort();
        info!("Stopped mock simulation");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::PinRef;

    fn meters() -> Vec<Probe> {
        vec![
            Probe {
                component_id: 3,
                kind: ProbeKind::Voltmeter,
            },
            Probe {
                component_id: 8,
                kind: ProbeKind::Ammeter,
            },
        ]
    }

    #[test]
    fn test_measurement_formats() {
        assert_eq!(format_volts(4.987), "4.99V");
        assert_eq!(format_volts(5.0), "5.00V");
        assert_eq!(format_milliamps(20.4), "20mA");
        assert_eq!(format_milliamps(19.6), "20mA");
    }

    #[test]
    fn test_tick_covers_every_probe() {
        let mut sim = MockSimulator::new(Some(1));
        let tick = sim.tick(&meters());
        assert_eq!(tick.measurements.len(), 2);
        assert!(tick.measurements[&3].ends_with('V'));
        assert!(tick.measurements[&8].ends_with("mA"));
        assert!((tick.readings.power - tick.readings.voltage * tick.readings.current).abs() < 1e-12);
        assert!(tick.readings.voltage > 4.7 && tick.readings.voltage < 5.3);
    }

    fn sensors() -> Vec<Probe> {
        [
            (1, ProbeKind::VoltageSensor),
            (2, ProbeKind::CurrentSensor),
            (3, ProbeKind::Thermistor),
            (4, ProbeKind::Piezo),
            (5, ProbeKind::RelayDrive { energized: true }),
        ]
        .into_iter()
        .map(|(component_id, kind)| Probe { component_id, kind })
        .collect()
    }

    fn volts(text: &str) -> f64 {
        text.trim_end_matches('V').parse().unwrap()
    }

    #[test]
    fn test_sensor_outputs_stay_in_adc_range() {
        let mut sim = MockSimulator::new(Some(3));
        for _ in 0..50 {
            let tick = sim.tick(&sensors());
            for id in 1..=4 {
                let v = volts(&tick.measurements[&id]);
                assert!((0.0..=3.3).contains(&v), "probe {} read {}", id, v);
            }
            // ACS712 sits near mid-rail for a 20 mA load
            assert!((volts(&tick.measurements[&2]) - 1.65).abs() < 0.02);
            assert_eq!(tick.measurements[&5], "HIGH");
        }
    }

    #[test]
    fn test_thermistor_follows_ramp() {
        let probe = [Probe {
            component_id: 9,
            kind: ProbeKind::Thermistor,
        }];
        let mut sim = MockSimulator::new(Some(0)).with_step(Duration::from_secs(100));
        assert_eq!(sim.tick(&probe).measurements[&9], "1.70V");
        assert_eq!(sim.tick(&probe).measurements[&9], "1.71V");
        assert_eq!(ntc_divider_volts(25.0), 1.65);
    }

    #[test]
    fn test_probes_cover_sensor_modules() {
        let mut d = Diagram::new();
        let relay = d.add_component(ComponentKind::Relay, 0.0, 0.0).unwrap();
        let loose = d.add_component(ComponentKind::Relay, 0.0, 200.0).unwrap();
        let bat = d.add_component(ComponentKind::Battery, 200.0, 0.0).unwrap();
        let acs = d.add_component(ComponentKind::Acs712, 200.0, 200.0).unwrap();
        d.add_component(ComponentKind::Resistor, 400.0, 0.0).unwrap();
        d.add_wire(PinRef::new(bat, "+"), PinRef::new(relay, "coil+")).unwrap();
        d.add_wire(PinRef::new(bat, "-"), PinRef::new(relay, "coil-")).unwrap();
        d.add_wire(PinRef::new(bat, "-"), PinRef::new(loose, "coil-")).unwrap();

        let found = probes(&d);
        assert_eq!(
            found,
            vec![
                Probe {
                    component_id: relay,
                    kind: ProbeKind::RelayDrive { energized: true },
                },
                Probe {
                    component_id: loose,
                    kind: ProbeKind::RelayDrive { energized: false },
                },
                Probe {
                    component_id: acs,
                    kind: ProbeKind::CurrentSensor,
                },
            ]
        );
        assert_eq!(adc_channel(&ComponentKind::Zmpt101b), Some("GPIO34"));
        assert_eq!(adc_channel(&ComponentKind::Voltmeter), None);
    }

    #[test]
    fn test_sensor_log_rows() {
        let mut d = Diagram::new();
        let first = d.add_component(ComponentKind::Acs712, 0.0, 0.0).unwrap();
        let second = d.add_component(ComponentKind::Acs712, 0.0, 100.0).unwrap();
        let relay = d.add_component(ComponentKind::Relay, 200.0, 0.0).unwrap();
        d.add_component(ComponentKind::Voltmeter, 200.0, 200.0).unwrap();

        let tick = |a: &str| SimulationTick {
            readings: Readings {
                voltage: 5.0,
                current: 0.02,
                power: 0.1,
            },
            measurements: [(first, a.to_string()), (relay, "LOW".to_string())]
                .into_iter()
                .collect(),
        };
        let rows = sensor_log(&d, &[tick("1.65V"), tick("1.66V")], Duration::from_millis(500));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].time, 0.5);
        assert_eq!(rows[1].channels["GPIO35"], Some(1.66));
        assert_eq!(rows[0].channels[&format!("GPIO35_{}", second)], None);
        assert_eq!(rows[0].channels["GPIO26"], Some(0.0));
        assert_eq!(rows[0].channels.len(), 3);

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["time"], 0.0);
        assert_eq!(json["GPIO35"], 1.65);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let mut a = MockSimulator::new(Some(42));
        let mut b = MockSimulator::new(Some(42));
        for _ in 0..5 {
            assert_eq!(a.tick(&meters()), b.tick(&meters()));
            assert_eq!(a.tick(&sensors()), b.tick(&sensors()));
        }
    }

    #[tokio::test]
    async fn test_driver_ticks_and_stops() {
        let mut handle = SimulationDriver::spawn(
            MockSimulator::new(Some(7)),
            meters(),
            Duration::from_millis(5),
        );
        let first = handle.next_tick().await.expect("first tick");
        assert_eq!(first.measurements.len(), 2);

        handle.set_probes(Vec::new());
        // ticks already queued still carry the old probe set
        let mut emptied = false;
        for _ in 0..40 {
            let tick = handle.next_tick().await.expect("later tick");
            if tick.measurements.is_empty() {
                emptied = true;
                break;
            }
        }
        assert!(emptied);

        assert!(handle.is_running());
        handle.stop();
    }
}
