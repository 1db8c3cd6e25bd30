use super::{PersistenceResult, validate_config};
use crate::calendar::CalendarGraphConfig;
use crate::graph::CalendarGraph;
use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

fn snapshot(graph: &CalendarGraph) -> PersistenceResult<CalendarGraphConfig> {
    let config = graph.to_config();
    validate_config(&config)?;
    Ok(config)
}

fn restore(config: CalendarGraphConfig) -> PersistenceResult<CalendarGraph> {
    validate_config(&config)?;
    CalendarGraph::from_config(config)
}

pub fn save_calendars_to_json<P: AsRef<Path>>(
    graph: &CalendarGraph,
    path: P,
) -> PersistenceResult<()> {
    let config = snapshot(graph)?;
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(BufWriter::new(file), &config)?;
    debug!(
        "saved {} calendar(s) to {}",
        config.calendars.len(),
        path.as_ref().display()
    );
    Ok(())
}

pub fn load_calendars_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<CalendarGraph> {
    let file = File::open(path.as_ref())?;
    let config: CalendarGraphConfig = serde_json::from_reader(BufReader::new(file))?;
    debug!(
        "loaded {} calendar(s) from {}",
        config.calendars.len(),
        path.as_ref().display()
    );
    restore(config)
}

pub fn calendars_to_json_string(graph: &CalendarGraph) -> PersistenceResult<String> {
    Ok(serde_json::to_string_pretty(&snapshot(graph)?)?)
}

pub fn calendars_from_json_str(json: &str) -> PersistenceResult<CalendarGraph> {
    restore(serde_json::from_str(json)?)
}
