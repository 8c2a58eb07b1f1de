use std::collections::BTreeMap;

use crate::foundation::error::PassageResult;

/// Composite key identifying one controller: (device name, channel, controller
/// number).
pub type ControlKey = (String, u8, u8);

/// Shortcut mappings for one input device.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct DeviceShortcuts {
    /// Note number → shortcut identifier.
    #[serde(default)]
    pub note_on: BTreeMap<u8, String>,
    /// Controller number → (discrete value → shortcut identifier).
    #[serde(default)]
    pub controller: BTreeMap<u8, BTreeMap<u8, String>>,
}

/// Controller shortcut configuration, keyed by device name.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ControllerConfig {
    /// Per-device shortcut mappings.
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceShortcuts>,
    /// Log every drained message.
    #[serde(default)]
    pub info: bool,
}

impl ControllerConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> PassageResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            crate::foundation::error::PassageError::controller(format!(
                "invalid controller configuration: {e}"
            ))
        })
    }
}

/// One hardware message drained from a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMessage {
    /// A note event; maps directly to a shortcut.
    NoteOn {
        /// Note number.
        note: u8,
    },
    /// A controller value event.
    Control {
        /// Channel number.
        channel: u8,
        /// Controller number.
        number: u8,
        /// Controller value.
        value: u8,
    },
}

/// A zero-wait input device port.
///
/// `fetch` must never block: it returns the next pending message or `None` when the
/// device's queue is empty. Hardware polling itself lives outside this crate.
pub trait ControlPort: Send {
    /// The device name this port belongs to.
    fn device(&self) -> &str;

    /// Fetch one pending message without waiting.
    fn fetch(&mut self) -> Option<ControlMessage>;
}

/// The persistent shared controller-value mapping.
///
/// Keys absent from a tick's accumulation retain their previous value.
#[derive(Clone, Debug, Default)]
pub struct ControllerState {
    values: BTreeMap<ControlKey, u8>,
}

impl ControllerState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last merged value for a controller, if any.
    pub fn get(&self, device: &str, channel: u8, number: u8) -> Option<u8> {
        self.values
            .get(&(device.to_string(), channel, number))
            .copied()
    }

    /// All merged values.
    pub fn values(&self) -> &BTreeMap<ControlKey, u8> {
        &self.values
    }

    /// Merge one tick's accumulation, last-write-wins per key.
    fn merge(&mut self, tick: BTreeMap<ControlKey, u8>) {
        self.values.extend(tick);
    }
}

/// Drains hardware messages once per cooperative polling tick and merges controller
/// values into shared state.
///
/// Setup failure is caught once at initialization and latched: every subsequent
/// tick is a no-op for the remainder of the process lifetime. There is no retry.
pub struct ControllerWatcher {
    config: ControllerConfig,
    ports: Vec<Box<dyn ControlPort>>,
    failed: bool,
}

impl ControllerWatcher {
    /// Connect the watcher to the opened device ports.
    ///
    /// Pass the result of the host's port-opening step; an `Err` latches the
    /// permanent `failed` flag.
    pub fn connect(
        config: ControllerConfig,
        ports: PassageResult<Vec<Box<dyn ControlPort>>>,
    ) -> Self {
        match ports {
            Ok(ports) => Self {
                config,
                ports,
                failed: false,
            },
            Err(e) => {
                tracing::error!(error = %e, "controller setup failed; polling disabled");
                Self {
                    config,
                    ports: Vec::new(),
                    failed: true,
                }
            }
        }
    }

    /// `true` when setup failed and polling is permanently disabled.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Run one polling tick.
    ///
    /// Drains every port without blocking (zero-wait fetch repeated until empty).
    /// Note events dispatch immediately. Controller-value events dispatch
    /// immediately when the (device, number, value) shortcut table matches and are
    /// not accumulated; otherwise they accumulate into a per-tick map that merges
    /// into `state` last-write-wins at tick end. Returns `true` only when something
    /// was accumulated and playback is not already continuous.
    pub fn poll_tick(
        &mut self,
        state: &mut ControllerState,
        playing: bool,
        on_shortcut: &mut dyn FnMut(&str, u8),
    ) -> bool {
        if self.failed {
            return false;
        }

        let mut accumulated: BTreeMap<ControlKey, u8> = BTreeMap::new();
        for port in &mut self.ports {
            let device = port.device().to_string();
            let mapping = self.config.devices.get(&device).cloned().unwrap_or_default();
            while let Some(msg) = port.fetch() {
                if self.config.info {
                    tracing::info!(device = %device, ?msg, "controller message");
                }
                match msg {
                    ControlMessage::NoteOn { note } => {
                        if let Some(shortcut) = mapping.note_on.get(&note) {
                            on_shortcut(shortcut, note);
                        }
                    }
                    ControlMessage::Control {
                        channel,
                        number,
                        value,
                    } => {
                        if let Some(shortcut) = mapping
                            .controller
                            .get(&number)
                            .and_then(|values| values.get(&value))
                        {
                            tracing::debug!(shortcut = %shortcut, value, "controller shortcut");
                            on_shortcut(shortcut, number);
                        } else {
                            accumulated.insert((device.clone(), channel, number), value);
                        }
                    }
                }
            }
        }

        let changed = !accumulated.is_empty();
        if changed {
            state.merge(accumulated);
        }
        changed && !playing
    }
}
