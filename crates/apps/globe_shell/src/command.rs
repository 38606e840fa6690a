use std::str::FromStr;

use foundation::HotspotId;

/// One step of a scripted session.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ToggleScan,
    Next,
    Prev,
    ExitScan,
    Jump(HotspotId),
    Select(Option<HotspotId>),
    Hover(Option<HotspotId>),
    Zoom(f64),
    Pan { d_lat: f64, d_lng: f64 },
    Resize { width: f64, height: f64 },
    Locate,
    Rerank,
    /// Re-fetch the catalog feed and swap in the next generation.
    Reload,
    /// Let extra frames elapse before the next command.
    Wait(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingArgument(&'static str),
    BadNumber(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Unknown(cmd) => write!(f, "unknown command {cmd:?}"),
            CommandError::MissingArgument(cmd) => write!(f, "command `{cmd}` needs an argument"),
            CommandError::BadNumber(raw) => write!(f, "not a number: {raw:?}"),
        }
    }
}

impl std::error::Error for CommandError {}

fn number<T: FromStr>(raw: &str) -> Result<T, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandError::BadNumber(raw.to_string()))
}

fn id_arg(arg: Option<&str>) -> Option<HotspotId> {
    arg.map(str::trim).filter(|s| !s.is_empty()).map(HotspotId::from)
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        match name {
            "scan" => Ok(Command::ToggleScan),
            "next" => Ok(Command::Next),
            "prev" => Ok(Command::Prev),
            "exit" => Ok(Command::ExitScan),
            "locate" => Ok(Command::Locate),
            "rerank" => Ok(Command::Rerank),
            "reload" => Ok(Command::Reload),
            "jump" => id_arg(arg)
                .map(Command::Jump)
                .ok_or(CommandError::MissingArgument("jump")),
            "select" => Ok(Command::Select(id_arg(arg))),
            "deselect" => Ok(Command::Select(None)),
            "hover" => Ok(Command::Hover(id_arg(arg))),
            "unhover" => Ok(Command::Hover(None)),
            "zoom" => {
                let arg = arg.ok_or(CommandError::MissingArgument("zoom"))?;
                Ok(Command::Zoom(number(arg)?))
            }
            "pan" => {
                // pan:<dlat>/<dlng>
                let arg = arg.ok_or(CommandError::MissingArgument("pan"))?;
                let (d_lat, d_lng) = arg
                    .split_once('/')
                    .ok_or(CommandError::MissingArgument("pan"))?;
                Ok(Command::Pan {
                    d_lat: number(d_lat)?,
                    d_lng: number(d_lng)?,
                })
            }
            "resize" => {
                // resize:<w>x<h>
                let arg = arg.ok_or(CommandError::MissingArgument("resize"))?;
                let (w, h) = arg
                    .split_once('x')
                    .ok_or(CommandError::MissingArgument("resize"))?;
                Ok(Command::Resize {
                    width: number(w)?,
                    height: number(h)?,
                })
            }
            "wait" => {
                let arg = arg.ok_or(CommandError::MissingArgument("wait"))?;
                Ok(Command::Wait(number(arg)?))
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

pub fn parse_script(steps: &[String]) -> Result<Vec<Command>, CommandError> {
    steps
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse())
        .collect()
}
