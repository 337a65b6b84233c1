use super::types::{
    BedWire, JobWire, PrintJob, PrinterBed, PrinterStatistics, PrinterWire, SdWire, Version,
};
use super::{Error, MAX_PATH_LEN, MAX_PAYLOAD_LEN};
use crate::network::Connect;
use crate::network::application::http::{
    Client, Config, MAX_BODY_LEN, Method, Request, Response,
};
use crate::system::clock::Clock;
use core::fmt::Write as _;
use heapless::{FnvIndexMap, String};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Reply text OctoPrint sends instead of JSON while no printer is attached.
const NOT_OPERATIONAL: &str = "Printer is not operational";

/// Print head axes that can be homed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    /// X axis.
    #[serde(rename = "x")]
    X,
    /// Y axis.
    #[serde(rename = "y")]
    Y,
    /// Z axis.
    #[serde(rename = "z")]
    Z,
}

/// Commands accepted by `/api/job`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobCommand {
    /// Start the selected file.
    Start,
    /// Cancel the running job.
    Cancel,
    /// Restart the paused job from the beginning.
    Restart,
    /// Toggle between paused and printing.
    TogglePause,
    /// Pause; a no-op when already paused.
    Pause,
    /// Resume; a no-op when not paused.
    Resume,
}

/// Core system actions under `/api/system/commands/core`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemAction {
    /// Shut the host down.
    Shutdown,
    /// Reboot the host.
    Reboot,
    /// Restart the OctoPrint server.
    Restart,
}

impl SystemAction {
    fn as_str(&self) -> &'static str {
        match self {
            SystemAction::Shutdown => "shutdown",
            SystemAction::Reboot => "reboot",
            SystemAction::Restart => "restart",
        }
    }
}

#[derive(Serialize)]
struct Command<'a> {
    command: &'a str,
}

#[derive(Serialize)]
struct PauseCommand<'a> {
    command: &'a str,
    action: &'a str,
}

#[derive(Serialize)]
struct SelectCommand<'a> {
    command: &'a str,
    print: bool,
}

#[derive(Serialize)]
struct HomeCommand<'a> {
    command: &'a str,
    axes: &'a [Axis],
}

#[derive(Serialize)]
struct JogCommand<'a> {
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    z: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
    absolute: bool,
}

#[derive(Serialize)]
struct ExtrudeCommand<'a> {
    command: &'a str,
    amount: f32,
}

#[derive(Serialize)]
struct BedTargetCommand<'a> {
    command: &'a str,
    target: u16,
}

#[derive(Serialize)]
struct ToolTargetCommand<'a> {
    command: &'a str,
    targets: FnvIndexMap<String<8>, u16, 2>,
}

fn nonzero(value: f32) -> Option<f32> {
    (value != 0.0).then_some(value)
}

/// OctoPrint REST client.
#[derive(Debug)]
pub struct OctoPrint<N: Connect, K: Clock> {
    client: Client<N, K>,
}

impl<N: Connect, K: Clock> OctoPrint<N, K> {
    /// Creates a client; nothing is connected until the first call.
    pub fn new(network: N, clock: K, config: Config) -> Self {
        Self {
            client: Client::new(network, clock, config),
        }
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &Client<N, K> {
        &self.client
    }

    /// The underlying HTTP client, mutably.
    pub fn client_mut(&mut self) -> &mut Client<N, K> {
        &mut self.client
    }

    // ---- reads ----

    /// `GET /api/version`
    pub fn version(&mut self) -> Result<Version, Error> {
        let response = self.get_ok("/api/version")?;
        parse(&response)
    }

    /// `GET /api/printer`
    ///
    /// While the server has no printer connected it answers `409` with the
    /// plain-text message `Printer is not operational`; that is returned as
    /// a record carrying the message as its state and every flag cleared.
    pub fn printer_statistics(&mut self) -> Result<PrinterStatistics, Error> {
        let response = self.fetch("/api/printer")?;
        if let Some(text) = response.body_str().map(str::trim) {
            if text == NOT_OPERATIONAL {
                return Ok(PrinterStatistics::from_state_text(text));
            }
        }
        expect_status(&response, 200)?;
        parse::<PrinterWire>(&response).map(PrinterStatistics::from)
    }

    /// `GET /api/job`
    pub fn print_job(&mut self) -> Result<PrintJob, Error> {
        let response = self.get_ok("/api/job")?;
        parse::<JobWire>(&response).map(PrintJob::from)
    }

    /// `GET /api/printer/bed?history=true&limit=2`
    pub fn printer_bed(&mut self) -> Result<PrinterBed, Error> {
        let response = self.get_ok("/api/printer/bed?history=true&limit=2")?;
        parse::<BedWire>(&response).map(PrinterBed::from)
    }

    /// `GET /api/printer/sd`, returning whether the card is ready.
    pub fn sd_state(&mut self) -> Result<bool, Error> {
        let response = self.get_ok("/api/printer/sd")?;
        parse::<SdWire>(&response).map(|sd| sd.ready.unwrap_or_default())
    }

    /// `GET /api/<name>`, returned undecoded whatever the status.
    pub fn endpoint(&mut self, name: &str) -> Result<Response, Error> {
        let path = join("/api/", name)?;
        Ok(self.client.get(&path)?)
    }

    // ---- connection ----

    /// Connects OctoPrint to the printer using its saved settings.
    pub fn connect(&mut self) -> Result<(), Error> {
        self.simple("/api/connection", "connect")
    }

    /// Disconnects OctoPrint from the printer.
    pub fn disconnect(&mut self) -> Result<(), Error> {
        self.simple("/api/connection", "disconnect")
    }

    /// Fakes an acknowledgement from the printer.
    pub fn fake_ack(&mut self) -> Result<(), Error> {
        self.simple("/api/connection", "fake_ack")
    }

    // ---- job ----

    /// Issues a job command.
    pub fn job(&mut self, command: JobCommand) -> Result<(), Error> {
        match command {
            JobCommand::Start => self.simple("/api/job", "start"),
            JobCommand::Cancel => self.simple("/api/job", "cancel"),
            JobCommand::Restart => self.simple("/api/job", "restart"),
            JobCommand::TogglePause => self.simple("/api/job", "pause"),
            JobCommand::Pause => self.command(
                "/api/job",
                &PauseCommand {
                    command: "pause",
                    action: "pause",
                },
            ),
            JobCommand::Resume => self.command(
                "/api/job",
                &PauseCommand {
                    command: "pause",
                    action: "resume",
                },
            ),
        }
    }

    /// Starts the selected file.
    pub fn start(&mut self) -> Result<(), Error> {
        self.job(JobCommand::Start)
    }

    /// Cancels the running job.
    pub fn cancel(&mut self) -> Result<(), Error> {
        self.job(JobCommand::Cancel)
    }

    /// Restarts the paused job.
    pub fn restart(&mut self) -> Result<(), Error> {
        self.job(JobCommand::Restart)
    }

    /// Toggles pause.
    pub fn toggle_pause(&mut self) -> Result<(), Error> {
        self.job(JobCommand::TogglePause)
    }

    /// Pauses the running job.
    pub fn pause(&mut self) -> Result<(), Error> {
        self.job(JobCommand::Pause)
    }

    /// Resumes the paused job.
    pub fn resume(&mut self) -> Result<(), Error> {
        self.job(JobCommand::Resume)
    }

    /// Selects a local file without starting it. `path` is relative to the
    /// upload folder and starts with `/`.
    pub fn select_file(&mut self, path: &str) -> Result<(), Error> {
        let target = join("/api/files/local", path)?;
        self.command(
            &target,
            &SelectCommand {
                command: "select",
                print: false,
            },
        )
    }

    // ---- print head, tools, bed ----

    /// Homes the given axes.
    pub fn home(&mut self, axes: &[Axis]) -> Result<(), Error> {
        self.command(
            "/api/printer/printhead",
            &HomeCommand {
                command: "home",
                axes,
            },
        )
    }

    /// Homes X and Y.
    pub fn home_xy(&mut self) -> Result<(), Error> {
        self.home(&[Axis::X, Axis::Y])
    }

    /// Jogs the print head relative to its position. Zero components are
    /// left out of the command, as is a zero `speed`.
    pub fn jog(&mut self, x: f32, y: f32, z: f32, speed: f32) -> Result<(), Error> {
        self.command(
            "/api/printer/printhead",
            &JogCommand {
                command: "jog",
                x: nonzero(x),
                y: nonzero(y),
                z: nonzero(z),
                speed: nonzero(speed),
                absolute: false,
            },
        )
    }

    /// Extrudes `amount` millimetres with the active tool (negative retracts).
    pub fn extrude(&mut self, amount: f32) -> Result<(), Error> {
        self.command(
            "/api/printer/tool",
            &ExtrudeCommand {
                command: "extrude",
                amount,
            },
        )
    }

    /// Sets the target temperature of hotend `tool` in °C.
    pub fn set_tool_temperature(&mut self, tool: u8, target: u16) -> Result<(), Error> {
        let mut name = String::<8>::new();
        write!(name, "tool{tool}").map_err(|_| Error::PayloadTooLarge)?;
        let mut targets = FnvIndexMap::new();
        targets
            .insert(name, target)
            .map_err(|_| Error::PayloadTooLarge)?;
        self.command(
            "/api/printer/tool",
            &ToolTargetCommand {
                command: "target",
                targets,
            },
        )
    }

    /// Sets the bed target temperature in °C.
    pub fn set_bed_temperature(&mut self, target: u16) -> Result<(), Error> {
        self.command(
            "/api/printer/bed",
            &BedTargetCommand {
                command: "target",
                target,
            },
        )
    }

    // ---- sd card ----

    /// Initializes the SD card.
    pub fn sd_init(&mut self) -> Result<(), Error> {
        self.simple("/api/printer/sd", "init")
    }

    /// Refreshes the SD card file list.
    pub fn sd_refresh(&mut self) -> Result<(), Error> {
        self.simple("/api/printer/sd", "refresh")
    }

    /// Releases the SD card.
    pub fn sd_release(&mut self) -> Result<(), Error> {
        self.simple("/api/printer/sd", "release")
    }

    // ---- system ----

    /// Runs a core system action.
    pub fn system(&mut self, action: SystemAction) -> Result<(), Error> {
        let path = join("/api/system/commands/core/", action.as_str())?;
        let response = self.client.request(&Request {
            method: Method::Post,
            path: &path,
            body: None,
        })?;
        expect_status(&response, 204)
    }

    /// Sends a raw G-code line to the printer.
    pub fn printer_command(&mut self, gcode: &str) -> Result<(), Error> {
        self.command("/api/printer/command", &Command { command: gcode })
    }

    // ---- plumbing ----

    fn fetch(&mut self, path: &str) -> Result<Response, Error> {
        let response = self.client.get(path)?;
        if !response.has_status() {
            return Err(Error::NoResponse(response.outcome));
        }
        Ok(response)
    }

    fn get_ok(&mut self, path: &str) -> Result<Response, Error> {
        let response = self.fetch(path)?;
        expect_status(&response, 200)?;
        Ok(response)
    }

    fn simple(&mut self, path: &str, command: &str) -> Result<(), Error> {
        self.command(path, &Command { command })
    }

    fn command<T: Serialize>(&mut self, path: &str, payload: &T) -> Result<(), Error> {
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        let len = serde_json_core::to_slice(payload, &mut buf).map_err(|_| Error::PayloadTooLarge)?;
        let response = self.client.post(path, &buf[..len])?;
        expect_status(&response, 204)
    }
}

fn expect_status(response: &Response, expected: i16) -> Result<(), Error> {
    match response.status_code {
        code if code == expected => Ok(()),
        _ if !response.has_status() => Err(Error::NoResponse(response.outcome)),
        code => Err(Error::UnexpectedStatus(code)),
    }
}

fn parse<T: DeserializeOwned>(response: &Response) -> Result<T, Error> {
    // Unescaped text is never longer than the body it came from.
    let mut scratch = [0u8; MAX_BODY_LEN];
    serde_json_core::from_slice_escaped::<T>(&response.body, &mut scratch)
        .map(|(value, _)| value)
        .map_err(|_| Error::Parse)
}

fn join(prefix: &str, suffix: &str) -> Result<String<MAX_PATH_LEN>, Error> {
    let mut path = String::new();
    path.push_str(prefix).map_err(|_| Error::PayloadTooLarge)?;
    path.push_str(suffix).map_err(|_| Error::PayloadTooLarge)?;
    Ok(path)
}
