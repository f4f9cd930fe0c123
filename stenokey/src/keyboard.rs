// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Top-level keyboard: owns every piece of state and runs the main loop.
//!
//! ```text
//! start ──► [button held?] ──► factory reset
//!   │
//!   ▼
//! poll: scan ─► update ─► emit on stroke ─► [button held?] ─► calibrate
//! ```
//!
//! All waits are blocking [`DelayNs`] calls; nothing here runs concurrently.

use core::fmt::{self, Write as _};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_io::Write;
use log::{debug, error, info, warn};

use crate::bitmap::KeyBitmap;
use crate::calibration::{CalibrationEvent, CalibrationStore, Calibrator};
use crate::config::{Config, ConfigError};
use crate::hw::{AdcRead, CalibrationButton, Clock, Indicator, MuxSelect};
use crate::keys::{KeyEvent, KeyState};
use crate::protocol::{encode_stroke, spell, KeyNames, Speller};
use crate::sensors::SensorMatrix;

const MSG_START: &str = "Starting calibration.\n\
    Please hold the calibration button until flashing stops.\n\
    Please don't press any key during that time.\n\n";
const MSG_ABORTED: &str = "Calibration aborted.\n\n";
const MSG_PRESS_KEYS: &str = "Please now press down each key all the way\n\
    Press the calibration button again when you are done.\n\n";
const MSG_RECORDED: &str = "Calibration recorded.\nUsing the new values.\n\n";
const MSG_NOT_SAVED: &str = "Warning: calibration could not be saved.\n\n";
const MSG_FACTORY_RESET: &str = "Calibration button held on startup.\n\
    Reverting calibration to factory defaults.\n\n";
const MSG_NOT_ERASED: &str = "Warning: stored calibration could not be erased.\n\n";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Before [`Keyboard::start`] has run.
    FactoryReset,
    Active,
    Calibrating,
}

/// How an interactive calibration ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CalibrationOutcome {
    /// Button released too early; nothing changed.
    Aborted,
    /// These keys did not move enough; the previous calibration stays.
    Rejected(KeyBitmap),
    /// New calibration in use. `saved` is false if it could not be persisted.
    Committed { saved: bool },
}

/// Status LEDs.
pub struct Indicators<ACT: OutputPin, CAL: OutputPin> {
    /// Lit while a chord packet goes out.
    pub activity: Indicator<ACT>,
    /// Blinks through calibration.
    pub calibration: Indicator<CAL>,
}

pub struct Keyboard<MUX, ADC, BTN, ACT, CAL, W, S, T>
where
    BTN: InputPin,
    ACT: OutputPin,
    CAL: OutputPin,
{
    matrix: SensorMatrix<MUX, ADC>,
    keys: KeyState,
    calibrator: Calibrator,
    button: CalibrationButton<BTN>,
    indicators: Indicators<ACT, CAL>,
    wire: W,
    store: S,
    timer: T,
    config: Config,
    mode: Mode,
}

impl<MUX, ADC, BTN, ACT, CAL, W, S, T> Keyboard<MUX, ADC, BTN, ACT, CAL, W, S, T>
where
    MUX: MuxSelect,
    ADC: AdcRead,
    BTN: InputPin,
    ACT: OutputPin,
    CAL: OutputPin,
    W: Write,
    S: CalibrationStore,
    T: DelayNs + Clock,
{
    /// Validate `config` and pick up the stored calibration, falling back to the defaults in
    /// `config` when there is none or it cannot be read.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mux: MUX,
        adc: ADC,
        button: CalibrationButton<BTN>,
        indicators: Indicators<ACT, CAL>,
        wire: W,
        mut store: S,
        timer: T,
        config: Config,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let calibration = match store.load() {
            Ok(Some(calibration)) => {
                info!("using stored calibration");
                calibration
            }
            Ok(None) => {
                info!("no stored calibration, using defaults");
                config.default_calibration.clone()
            }
            Err(e) => {
                warn!("stored calibration unreadable ({:?}), using defaults", e);
                config.default_calibration.clone()
            }
        };

        let degenerate = calibration.degenerate(config.mask);
        if !degenerate.is_empty() {
            warn!("keys with no calibrated range will never press: {}", KeyNames(degenerate));
        }

        Ok(Self {
            matrix: SensorMatrix::new(mux, adc, config.mask, calibration),
            keys: KeyState::new(config.mask, config.thresh_high, config.thresh_low),
            calibrator: Calibrator::new(config.mask, config.timing.dwell_ms, config.min_deflection),
            button,
            indicators,
            wire,
            store,
            timer,
            config,
            mode: Mode::FactoryReset,
        })
    }

    /// Start up and run the keyboard forever.
    pub fn run(mut self) -> ! {
        self.start();
        loop {
            self.poll();
        }
    }

    /// Startup check: a button held at power-on reverts to the factory calibration.
    pub fn start(&mut self) {
        self.mode = Mode::FactoryReset;
        if self.button.is_held() {
            self.factory_reset();
        }
        self.mode = Mode::Active;
        info!("keyboard active");
    }

    /// One main loop iteration. Returns the stroke sent, if one was completed.
    pub fn poll(&mut self) -> Option<KeyBitmap> {
        let mut sent = None;
        if self.matrix.scan(&mut self.timer) {
            if let KeyEvent::Stroke(stroke) = self.keys.update(self.matrix.output()) {
                self.emit(stroke);
                sent = Some(stroke);
            }
        }

        if self.button.is_held() {
            self.mode = Mode::Calibrating;
            self.calibrate();
            self.mode = Mode::Active;
        }
        sent
    }

    /// Interactive calibration, entered with the button held down.
    pub fn calibrate(&mut self) -> CalibrationOutcome {
        let timing = self.config.timing;
        info!("calibration started");

        self.timer.delay_ms(timing.debounce_ms);
        self.say(MSG_START);
        self.calibrator.start(self.timer.now_ms(), self.matrix.calibration());

        let outcome = loop {
            let blink = self.calibrator.indicator(self.timer.now_ms());
            self.indicators.calibration.set(blink);

            self.matrix.scan(&mut self.timer);
            let held = self.button.is_held();

            match self.calibrator.step(self.timer.now_ms(), held, self.matrix.readings()) {
                CalibrationEvent::Capturing => {}
                CalibrationEvent::Aborted => {
                    self.indicators.calibration.off();
                    info!("calibration aborted");
                    self.say(MSG_ABORTED);
                    break CalibrationOutcome::Aborted;
                }
                CalibrationEvent::RestingCaptured => {
                    debug!("resting values captured");
                    self.timer.delay_ms(timing.debounce_ms);
                    self.say(MSG_PRESS_KEYS);
                }
                CalibrationEvent::Finished(Err(failed)) => {
                    self.indicators.calibration.on();
                    warn!("calibration rejected, keys not pressed: {}", KeyNames(failed));
                    self.say_fmt(format_args!(
                        "Error: the following keys were not calibrated: {}\n\n",
                        KeyNames(failed)
                    ));
                    break CalibrationOutcome::Rejected(failed);
                }
                CalibrationEvent::Finished(Ok(calibration)) => {
                    self.indicators.calibration.on();
                    let saved = match self.store.save(&calibration) {
                        Ok(()) => true,
                        Err(e) => {
                            error!("could not save calibration: {:?}", e);
                            false
                        }
                    };
                    self.matrix.set_calibration(calibration);
                    self.indicators.calibration.off();
                    info!("calibration committed (saved: {})", saved);

                    self.say(MSG_RECORDED);
                    if !saved {
                        self.say(MSG_NOT_SAVED);
                    }
                    break CalibrationOutcome::Committed { saved };
                }
            }
        };

        if outcome != CalibrationOutcome::Aborted {
            self.wait_for_release();
            self.indicators.calibration.off();
        }
        self.keys.reset();
        // Keys still down must show up as a change on the next scan.
        self.matrix.clear();
        outcome
    }

    /// Drop the stored calibration and go back to the configured defaults.
    pub fn factory_reset(&mut self) {
        warn!("calibration button held at startup, reverting to factory calibration");
        self.say(MSG_FACTORY_RESET);

        if let Err(e) = self.store.erase() {
            error!("could not erase stored calibration: {:?}", e);
            self.say(MSG_NOT_ERASED);
        }
        self.reset_to_defaults();
        self.wait_for_release();
    }

    /// Reload calibration and thresholds from the configuration and clear all scan state.
    pub fn reset_to_defaults(&mut self) {
        let config = &self.config;
        self.matrix.set_calibration(config.default_calibration.clone());
        self.matrix.clear();
        self.keys.set_thresholds(config.thresh_high, config.thresh_low);
        self.calibrator =
            Calibrator::new(config.mask, config.timing.dwell_ms, config.min_deflection);
    }

    /// Send a finished stroke, holding the activity LED for the inter-packet spacing.
    pub fn emit(&mut self, stroke: KeyBitmap) {
        debug!("stroke {}", KeyNames(stroke));
        self.indicators.activity.on();
        if let Err(e) = self.wire.write_all(&encode_stroke(stroke)) {
            warn!("stroke packet dropped: {:?}", e);
        }
        self.timer.delay_ms(self.config.timing.packet_spacing_ms);
        self.indicators.activity.off();
    }

    /// Finger-spell a message to the user.
    pub fn say(&mut self, text: &str) {
        if let Err(e) = spell(&mut self.wire, text) {
            warn!("feedback message dropped: {:?}", e);
        }
    }

    /// [`Keyboard::say`] for formatted text.
    pub fn say_fmt(&mut self, args: fmt::Arguments<'_>) {
        let mut speller = Speller::new(&mut self.wire);
        if speller.write_fmt(args).is_err() {
            match speller.take_error() {
                Some(e) => warn!("feedback message dropped: {:?}", e),
                None => warn!("feedback message could not be formatted"),
            }
        }
    }

    fn wait_for_release(&mut self) {
        let timing = self.config.timing;
        self.timer.delay_ms(timing.debounce_ms);
        while self.button.is_held() {
            self.timer.delay_ms(timing.button_poll_ms);
        }
        self.timer.delay_ms(timing.debounce_ms);
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn matrix(&self) -> &SensorMatrix<MUX, ADC> {
        &self.matrix
    }

    #[inline]
    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
