//! Records returned by the OctoPrint endpoints, and the wire shapes they are
//! decoded from.
//!
//! Every read returns a fresh record. Fields the server leaves out or sends
//! as `null` come back as `None`, `false` or an empty string. Text longer
//! than its field is cut at the last character boundary that fits.

use core::fmt;
use core::marker::PhantomData;
use heapless::{String, Vec};
use serde::Deserialize;
use serde::de::{self, Deserializer, Visitor};

/// Text capacity for state strings.
pub const MAX_STATE_LEN: usize = 48;
/// Text capacity for file names.
pub const MAX_FILE_NAME_LEN: usize = 96;
/// Text capacity for short identifiers (origins, versions).
pub const MAX_TAG_LEN: usize = 24;

/// `GET /api/version`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Version {
    /// API version, e.g. `0.1`.
    #[serde(deserialize_with = "text")]
    pub api: String<MAX_TAG_LEN>,
    /// Server version, e.g. `1.9.3`.
    #[serde(default, deserialize_with = "text")]
    pub server: String<MAX_TAG_LEN>,
}

/// One heater's readings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Heater {
    /// Measured temperature in °C.
    pub actual: f32,
    /// Target temperature in °C.
    pub target: f32,
    /// Configured offset in °C.
    pub offset: f32,
    /// Whether the server reported this heater at all.
    pub available: bool,
}

/// `GET /api/printer`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrinterStatistics {
    /// Human readable state, e.g. `Operational`.
    pub state: String<MAX_STATE_LEN>,
    /// Closed or in an error state.
    pub closed_or_error: bool,
    /// In an error state.
    pub error: bool,
    /// Finishing a print.
    pub finishing: bool,
    /// Connected and able to accept commands.
    pub operational: bool,
    /// Paused.
    pub paused: bool,
    /// Pausing.
    pub pausing: bool,
    /// Printing.
    pub printing: bool,
    /// Ready to start a print.
    pub ready: bool,
    /// Resuming.
    pub resuming: bool,
    /// SD card initialized.
    pub sd_ready: bool,
    /// Heated bed.
    pub bed: Heater,
    /// First hotend.
    pub tool0: Heater,
    /// Second hotend.
    pub tool1: Heater,
}

impl PrinterStatistics {
    /// The record reported when the server answers with a plain-text state
    /// message instead of JSON (e.g. `Printer is not operational`).
    pub fn from_state_text(text: &str) -> Self {
        Self {
            state: truncate(text),
            ..Self::default()
        }
    }
}

/// Filament usage estimate for one tool.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Filament {
    /// Length in millimetres.
    #[serde(default)]
    pub length: Option<f32>,
    /// Volume in cubic centimetres.
    #[serde(default)]
    pub volume: Option<f32>,
}

/// `GET /api/job`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrintJob {
    /// Printer state text.
    pub state: String<MAX_STATE_LEN>,
    /// Estimated total print time in seconds.
    pub estimated_print_time: Option<u32>,
    /// Selected file name.
    pub file_name: String<MAX_FILE_NAME_LEN>,
    /// `local` or `sdcard`.
    pub file_origin: String<MAX_TAG_LEN>,
    /// File size in bytes.
    pub file_size: Option<u64>,
    /// Upload timestamp (Unix seconds).
    pub file_date: Option<u64>,
    /// Completion in percent.
    pub completion: Option<f32>,
    /// Current byte offset in the file.
    pub filepos: Option<u64>,
    /// Elapsed print time in seconds.
    pub print_time: Option<u32>,
    /// Remaining print time in seconds.
    pub print_time_left: Option<u32>,
    /// Where the remaining time estimate came from.
    pub print_time_left_origin: String<MAX_TAG_LEN>,
    /// Filament estimate for tool 0.
    pub tool0_filament: Filament,
    /// Filament estimate for tool 1.
    pub tool1_filament: Filament,
}

/// `GET /api/printer/bed?history=true&limit=2`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PrinterBed {
    /// Measured temperature in °C.
    pub actual: f32,
    /// Configured offset in °C.
    pub offset: f32,
    /// Target temperature in °C.
    pub target: f32,
    /// Timestamp of the oldest history sample returned.
    pub history_timestamp: Option<u64>,
    /// Bed temperature of that sample.
    pub history_actual: Option<f32>,
}

// ---- text decoding ----

/// `s` cut to at most `N` bytes without splitting a character.
fn truncate<const N: usize>(s: &str) -> String<N> {
    let mut end = s.len().min(N);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::new();
    // Fits: `end <= N`.
    let _ = out.push_str(&s[..end]);
    out
}

struct TextVisitor<const N: usize>;

impl<'de, const N: usize> Visitor<'de> for TextVisitor<N> {
    type Value = String<N>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(truncate(v))
    }
}

struct OptionalTextVisitor<const N: usize>(PhantomData<String<N>>);

impl<'de, const N: usize> Visitor<'de> for OptionalTextVisitor<N> {
    type Value = Option<String<N>>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        text(d).map(Some)
    }
}

fn text<'de, D: Deserializer<'de>, const N: usize>(d: D) -> Result<String<N>, D::Error> {
    d.deserialize_str(TextVisitor::<N>)
}

fn optional_text<'de, D: Deserializer<'de>, const N: usize>(
    d: D,
) -> Result<Option<String<N>>, D::Error> {
    d.deserialize_option(OptionalTextVisitor::<N>(PhantomData))
}

// ---- wire shapes ----

#[derive(Deserialize)]
pub(super) struct PrinterWire {
    #[serde(default)]
    state: Option<StateWire>,
    #[serde(default)]
    temperature: Option<TemperatureWire>,
}

#[derive(Deserialize)]
struct StateWire {
    #[serde(default, deserialize_with = "optional_text")]
    text: Option<String<MAX_STATE_LEN>>,
    #[serde(default)]
    flags: Option<FlagsWire>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct FlagsWire {
    #[serde(default)]
    closed_or_error: Option<bool>,
    #[serde(default)]
    error: Option<bool>,
    #[serde(default)]
    finishing: Option<bool>,
    #[serde(default)]
    operational: Option<bool>,
    #[serde(default)]
    paused: Option<bool>,
    #[serde(default)]
    pausing: Option<bool>,
    #[serde(default)]
    printing: Option<bool>,
    #[serde(default)]
    ready: Option<bool>,
    #[serde(default)]
    resuming: Option<bool>,
    #[serde(default)]
    sd_ready: Option<bool>,
}

#[derive(Deserialize)]
struct TemperatureWire {
    #[serde(default)]
    bed: Option<HeaterWire>,
    #[serde(default)]
    tool0: Option<HeaterWire>,
    #[serde(default)]
    tool1: Option<HeaterWire>,
}

#[derive(Deserialize, Clone, Copy)]
struct HeaterWire {
    #[serde(default)]
    actual: Option<f32>,
    #[serde(default)]
    target: Option<f32>,
    #[serde(default)]
    offset: Option<f32>,
}

impl From<Option<HeaterWire>> for Heater {
    fn from(wire: Option<HeaterWire>) -> Self {
        match wire {
            Some(h) => Heater {
                actual: h.actual.unwrap_or_default(),
                target: h.target.unwrap_or_default(),
                offset: h.offset.unwrap_or_default(),
                available: true,
            },
            None => Heater::default(),
        }
    }
}

impl From<PrinterWire> for PrinterStatistics {
    fn from(wire: PrinterWire) -> Self {
        let mut stats = PrinterStatistics::default();
        if let Some(state) = wire.state {
            stats.state = state.text.unwrap_or_default();
            let flags = state.flags.unwrap_or_default();
            stats.closed_or_error = flags.closed_or_error.unwrap_or_default();
            stats.error = flags.error.unwrap_or_default();
            stats.finishing = flags.finishing.unwrap_or_default();
            stats.operational = flags.operational.unwrap_or_default();
            stats.paused = flags.paused.unwrap_or_default();
            stats.pausing = flags.pausing.unwrap_or_default();
            stats.printing = flags.printing.unwrap_or_default();
            stats.ready = flags.ready.unwrap_or_default();
            stats.resuming = flags.resuming.unwrap_or_default();
            stats.sd_ready = flags.sd_ready.unwrap_or_default();
        }
        if let Some(temperature) = wire.temperature {
            stats.bed = temperature.bed.into();
            stats.tool0 = temperature.tool0.into();
            stats.tool1 = temperature.tool1.into();
        }
        stats
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JobWire {
    #[serde(default, deserialize_with = "optional_text")]
    state: Option<String<MAX_STATE_LEN>>,
    #[serde(default)]
    job: Option<JobInfoWire>,
    #[serde(default)]
    progress: Option<ProgressWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobInfoWire {
    #[serde(default)]
    estimated_print_time: Option<f64>,
    #[serde(default)]
    file: Option<FileWire>,
    #[serde(default)]
    filament: Option<FilamentWire>,
}

#[derive(Deserialize)]
struct FileWire {
    #[serde(default, deserialize_with = "optional_text")]
    name: Option<String<MAX_FILE_NAME_LEN>>,
    #[serde(default, deserialize_with = "optional_text")]
    origin: Option<String<MAX_TAG_LEN>>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    date: Option<u64>,
}

#[derive(Deserialize)]
struct FilamentWire {
    #[serde(default)]
    tool0: Option<Filament>,
    #[serde(default)]
    tool1: Option<Filament>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressWire {
    #[serde(default)]
    completion: Option<f32>,
    #[serde(default)]
    filepos: Option<u64>,
    #[serde(default)]
    print_time: Option<f64>,
    #[serde(default)]
    print_time_left: Option<f64>,
    #[serde(default, deserialize_with = "optional_text")]
    print_time_left_origin: Option<String<MAX_TAG_LEN>>,
}

fn seconds(value: Option<f64>) -> Option<u32> {
    value.filter(|v| *v >= 0.0).map(|v| v as u32)
}

impl From<JobWire> for PrintJob {
    fn from(wire: JobWire) -> Self {
        let mut job = PrintJob {
            state: wire.state.unwrap_or_default(),
            ..PrintJob::default()
        };
        if let Some(info) = wire.job {
            job.estimated_print_time = seconds(info.estimated_print_time);
            if let Some(file) = info.file {
                job.file_name = file.name.unwrap_or_default();
                job.file_origin = file.origin.unwrap_or_default();
                job.file_size = file.size;
                job.file_date = file.date;
            }
            if let Some(filament) = info.filament {
                job.tool0_filament = filament.tool0.unwrap_or_default();
                job.tool1_filament = filament.tool1.unwrap_or_default();
            }
        }
        if let Some(progress) = wire.progress {
            job.completion = progress.completion;
            job.filepos = progress.filepos;
            job.print_time = seconds(progress.print_time);
            job.print_time_left = seconds(progress.print_time_left);
            job.print_time_left_origin = progress.print_time_left_origin.unwrap_or_default();
        }
        job
    }
}

#[derive(Deserialize)]
pub(super) struct BedWire {
    #[serde(default)]
    bed: Option<HeaterWire>,
    #[serde(default)]
    history: Option<Vec<HistoryWire, 4>>,
}

#[derive(Deserialize)]
struct HistoryWire {
    #[serde(default)]
    time: Option<u64>,
    #[serde(default)]
    bed: Option<HeaterWire>,
}

impl From<BedWire> for PrinterBed {
    fn from(wire: BedWire) -> Self {
        let heater = Heater::from(wire.bed);
        let oldest = wire.history.as_ref().and_then(|h| h.first());
        PrinterBed {
            actual: heater.actual,
            offset: heater.offset,
            target: heater.target,
            history_timestamp: oldest.and_then(|s| s.time),
            history_actual: oldest.and_then(|s| s.bed).and_then(|b| b.actual),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct SdWire {
    #[serde(default)]
    pub(super) ready: Option<bool>,
}
