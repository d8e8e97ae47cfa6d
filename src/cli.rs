//! Line-oriented terminal host: command parsing and a text presenter.

use crate::app::panel::TourPanel;
use crate::app::selection::Slot;
use crate::app::tour_list;
use crate::app::{AppContext, Choice, Intent};
use crate::models::{Coordinates, PlanMode, PoiCatalog};
use crate::runtime::{Presenter, SessionCommand};
use geojson::FeatureCollection;
use std::io::Write;

pub const HELP: &str = "\
Commands:
  start <name|gps|none>       set the route start
  end <name|gps|none>         set the route end
  tour-start <name|gps|none>  set the tour start
  add <name>                  add a tour stop
  remove <n>                  remove tour stop number n
  mode standard|tour          switch planner tab
  travel walk|bike            travel mode of the route panel
  tour-travel walk|bike       travel mode for tour planning
  time auto|manual            departure time source
  depart HH:MM                manual departure time
  click <lat>,<lon>           click the map
  pick <n>                    choose entry n of the open menu
  close                       close the menu
  go                          plan the tour
  reset-view                  recentre the map
  clear                       clear everything
  layers                      dump map layers as GeoJSON
  pois                        list known places
  help                        show this text
  quit                        exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(SessionCommand),
    Help,
    Blank,
}

pub fn parse_line(line: &str) -> Result<Input, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Blank);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let dispatch =
        |intent: Intent| -> Result<Input, String> { Ok(Input::Command(SessionCommand::Dispatch(intent))) };

    match verb.to_lowercase().as_str() {
        "start" | "end" | "tour-start" => {
            let slot: Slot = verb.parse()?;
            dispatch(Intent::Select {
                slot,
                choice: parse_choice(rest)?,
            })
        }
        "add" => dispatch(Intent::AddTourStop(required(rest, "add <name>")?.to_string())),
        "remove" => {
            let number: usize = required(rest, "remove <n>")?
                .parse()
                .map_err(|_| format!("Invalid stop number: '{}'", rest))?;
            dispatch(Intent::RemoveTourStop(tour_list::index_for_number(number)))
        }
        "mode" => dispatch(Intent::SetMode(required(rest, "mode standard|tour")?.parse()?)),
        "travel" => dispatch(Intent::SetTravelMode(required(rest, "travel walk|bike")?.parse()?)),
        "tour-travel" => dispatch(Intent::SetTourTravelMode(
            required(rest, "tour-travel walk|bike")?.parse()?,
        )),
        "time" => dispatch(Intent::SetTimeMode(required(rest, "time auto|manual")?.parse()?)),
        "depart" => dispatch(Intent::SetManualTime(rest.to_string())),
        "click" => {
            let at: Coordinates = required(rest, "click <lat>,<lon>")?.parse()?;
            dispatch(Intent::MapClick(at))
        }
        "pick" => {
            let number: usize = required(rest, "pick <n>")?
                .parse()
                .map_err(|_| format!("Invalid menu entry: '{}'", rest))?;
            Ok(Input::Command(SessionCommand::PickMenu(number)))
        }
        "close" => dispatch(Intent::ClosePopup),
        "go" | "plan" => dispatch(Intent::PlanTour),
        "reset-view" => dispatch(Intent::ResetView),
        "clear" => dispatch(Intent::ClearAll),
        "layers" => Ok(Input::Command(SessionCommand::DumpLayers)),
        "pois" => Ok(Input::Command(SessionCommand::ListPois)),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" => Ok(Input::Command(SessionCommand::Quit)),
        _ => Err(format!("Unknown command '{}', try 'help'", verb)),
    }
}

fn parse_choice(rest: &str) -> Result<Choice, String> {
    match rest.to_lowercase().as_str() {
        "" => Err("Expected a place name, 'gps' or 'none'".to_string()),
        "none" | "-" => Ok(Choice::Clear),
        "gps" | "here" => Ok(Choice::CurrentLocation),
        _ => Ok(Choice::Poi(rest.to_string())),
    }
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(rest)
    }
}

/// Text snapshot of the state the user can see
pub fn snapshot(ctx: &AppContext) -> String {
    let selection = ctx.selection();
    let name_of = |slot| {
        selection
            .point(slot)
            .map(|p| p.name.as_str())
            .unwrap_or("-")
            .to_string()
    };

    let mut out = String::new();
    match ctx.mode() {
        PlanMode::Standard => {
            out.push_str(&format!(
                "[standard | {} | time {:?}] start: {}  end: {}\n",
                ctx.travel_mode().label(),
                ctx.time_mode(),
                name_of(Slot::StandardStart),
                name_of(Slot::StandardEnd)
            ));
            out.push_str(&ctx.standard_panel().to_string());
            out.push('\n');
        }
        PlanMode::Tour => {
            out.push_str(&format!(
                "[tour | {} | time {:?}] start: {}\n",
                ctx.tour_travel_mode().label(),
                ctx.time_mode(),
                name_of(Slot::TourStart)
            ));
            for item in ctx.tour_stops() {
                out.push_str(&format!("  {}\n", item));
            }
            if *ctx.tour_panel() != TourPanel::Empty {
                out.push_str(&ctx.tour_panel().to_string());
                out.push('\n');
            }
        }
    }

    if let Some(popup) = ctx.popup() {
        out.push_str(&format!("Menu for {}:\n", popup.poi));
        for (i, action) in popup.actions.iter().enumerate() {
            out.push_str(&format!("  {}) {}\n", i + 1, action.label()));
        }
    }
    out
}

/// Writes snapshots to a writer, skipping unchanged ones
pub struct TerminalPresenter<W: Write + Send> {
    out: W,
    last: String,
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        TerminalPresenter {
            out,
            last: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::error!("Failed to write output: {}", e);
        }
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn alert(&mut self, message: &str) {
        self.write(&format!("!! {}", message));
    }

    fn present(&mut self, ctx: &AppContext) {
        let text = snapshot(ctx);
        if text != self.last {
            self.write(text.trim_end());
            self.last = text;
        }
    }

    fn show_layers(&mut self, layers: &FeatureCollection) {
        match serde_json::to_string_pretty(layers) {
            Ok(json) => self.write(&json),
            Err(e) => tracing::error!("Failed to serialize layers: {}", e),
        }
    }

    fn show_pois(&mut self, catalog: &PoiCatalog) {
        let names: Vec<&str> = catalog.all().iter().map(|p| p.name.as_str()).collect();
        self.write(&format!("{} places: {}", names.len(), names.join(", ")));
    }
}
