// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use slotlist::prelude::*;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

fn load_config(path: &Path) -> Option<ListConfig> {
    let f = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("Failed to open {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_reader(BufReader::new(f)) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::error!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

/// Sends every dump to the log and into the accumulating report.
struct Report {
    log: TracingSink,
    recording: RecordingSink,
}

impl DiagnosticSink for Report {
    fn record(&mut self, snapshot: &DiagnosticSnapshot, error: Option<&ListError>) {
        self.log.record(snapshot, error);
        self.recording.record(snapshot, error);
    }
}

fn step<T>(list: &IndexedList, report: &mut Report, label: &str, result: Result<T, ListError>)
where
    T: std::fmt::Debug,
{
    match &result {
        Ok(v) => tracing::info!("{}: ok {:?} -> {:?}", label, v, list.to_vec()),
        Err(e) => tracing::warn!("{}: {}", label, e),
    }
    list.dump_to(report, result.as_ref().err());
}

fn run_session(config: ListConfig, report: &mut Report) -> Result<(), ListError> {
    let mut list = IndexedList::with_config(config)?.with_provenance(Provenance::new(
        "list",
        file!(),
        "run_session",
        line!(),
    ));
    list.dump_to(report, None);

    for v in [5, 10, 15] {
        let r = list.push_back(v);
        step(&list, report, &format!("push_back({})", v), r);
    }
    let r = list.insert(1, 20);
    step(&list, report, "insert(1, 20)", r);
    let r = list.insert(list.len() + 1, 99);
    step(&list, report, "insert(len + 1, 99)", r);
    let r = list.remove(1);
    step(&list, report, "remove(1)", r);
    let r = list.pop_front();
    step(&list, report, "pop_front()", r);
    let r = list.linearize();
    step(&list, report, "linearize()", r);
    while !list.is_empty() {
        let r = list.pop_back();
        step(&list, report, "pop_back()", r);
    }
    let r = list.pop_back();
    step(&list, report, "pop_back() on empty", r);

    list.destroy()
}

fn main() {
    enable_tracing();

    let mut args = std::env::args().skip(1);
    let config = match args.next().map(PathBuf::from) {
        Some(path) => match load_config(&path) {
            Some(cfg) => cfg,
            None => std::process::exit(2),
        },
        None => ListConfig::default(),
    };
    let out_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("slotlist_report.json"));

    tracing::info!("Starting session with {:?}", config);

    let mut report = Report {
        log: TracingSink,
        recording: RecordingSink::new(),
    };
    if let Err(e) = run_session(config, &mut report) {
        tracing::error!("Session aborted: {}", e);
    }

    match report.recording.to_json().and_then(|json| {
        File::create(&out_path)
            .and_then(|mut f| f.write_all(json.as_bytes()))
            .map_err(serde_json::Error::io)
    }) {
        Ok(()) => tracing::info!(
            "Wrote {} dump(s) to {}",
            report.recording.len(),
            out_path.display()
        ),
        Err(e) => tracing::error!("Failed to write report to {}: {}", out_path.display(), e),
    }
}
