//! The debugging session behind the workbench pages.
//!
//! Remote calls are split into `begin_*`, which snapshots the inputs and
//! issues a [`RequestTicket`], and `finish_*`, which applies the response
//! only if its ticket is still the active one. A response that arrives
//! after a newer request (or after [`Workbench::clear`]) is dropped.

use serde_json::json;
use wp_docs::{DocViewer, RequestTicket, TicketCounter};
use wp_editor_core::EngineOptions;
use wp_editor_core::studio::StudioOptions;

use crate::api::{Operation, ParseRequest, ParsedField, RecordResponse, RemoteFailure, TransformRequest};
use crate::error::WorkbenchError;
use crate::remote::RemoteEngine;
use crate::sample::{SAMPLE_LOG, SAMPLE_OML, SAMPLE_RULE};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Parse,
    Convert,
    Knowledge,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Tab::Parse => "Parse",
            Tab::Convert => "Convert",
            Tab::Knowledge => "Help center",
        }
    }
}

/// The text inputs of the workbench.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    Logs,
    Rules,
    Oml,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Logs, Panel::Rules, Panel::Oml];

    /// Editor configuration for the panel: plain text, no line numbers,
    /// indentation folding.
    pub fn engine_options(self) -> EngineOptions {
        EngineOptions::Studio(StudioOptions {
            language: "text".into(),
            line_numbers: false,
            folding: true,
            ..StudioOptions::default()
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Table,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResultView {
    pub mode: ViewMode,
    pub show_empty: bool,
}

impl Default for ResultView {
    fn default() -> Self {
        Self {
            mode: ViewMode::Table,
            show_empty: true,
        }
    }
}

/// One result area: a record or a failure, plus how it is displayed.
#[derive(Clone, Debug, Default)]
pub struct ResultPanel {
    pub view: ResultView,
    record: Option<RecordResponse>,
    error: Option<RemoteFailure>,
}

impl ResultPanel {
    pub fn record(&self) -> Option<&RecordResponse> {
        self.record.as_ref()
    }

    pub fn error(&self) -> Option<&RemoteFailure> {
        self.error.as_ref()
    }

    fn set_record(&mut self, record: RecordResponse) {
        self.record = Some(record);
        self.error = None;
    }

    fn clear(&mut self) {
        self.record = None;
        self.error = None;
    }

    /// Fields to list, honouring the show-empty toggle.
    pub fn visible_fields(&self) -> Vec<&ParsedField> {
        let Some(record) = &self.record else {
            return Vec::new();
        };
        record
            .fields
            .iter()
            .filter(|field| self.view.show_empty || !field.is_empty_value())
            .collect()
    }

    /// The JSON view: the engine's own rendering pretty-printed when it
    /// parses, verbatim when it doesn't, and the filtered field list when the
    /// engine sent none.
    pub fn rendered_json(&self) -> Option<String> {
        let record = self.record.as_ref()?;
        if !record.format_json.is_empty() {
            let pretty = serde_json::from_str::<serde_json::Value>(&record.format_json)
                .and_then(|value| serde_json::to_string_pretty(&value));
            return Some(pretty.unwrap_or_else(|_| record.format_json.clone()));
        }
        let value = json!({
            "fields": self.visible_fields(),
            "format_json": record.format_json,
        });
        serde_json::to_string_pretty(&value).ok()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseJob {
    pub ticket: RequestTicket,
    pub request: ParseRequest,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransformJob {
    pub ticket: RequestTicket,
    pub request: TransformRequest,
}

#[derive(Debug, Default)]
pub struct Workbench {
    tab: Tab,
    logs: String,
    rules: String,
    oml: String,
    connection_id: Option<i32>,
    parse: ResultPanel,
    /// The parse result as shown on the convert page.
    transform_input: ResultPanel,
    transform: ResultPanel,
    parse_tickets: TicketCounter,
    transform_tickets: TicketCounter,
    docs: DocViewer,
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn text(&self, panel: Panel) -> &str {
        match panel {
            Panel::Logs => &self.logs,
            Panel::Rules => &self.rules,
            Panel::Oml => &self.oml,
        }
    }

    pub fn set_text(&mut self, panel: Panel, text: impl Into<String>) {
        let text = text.into();
        match panel {
            Panel::Logs => self.logs = text,
            Panel::Rules => self.rules = text,
            Panel::Oml => self.oml = text,
        }
    }

    pub fn set_connection_id(&mut self, id: Option<i32>) {
        self.connection_id = id;
    }

    pub fn parse_result(&self) -> &ResultPanel {
        &self.parse
    }

    pub fn parse_result_mut(&mut self) -> &mut ResultPanel {
        &mut self.parse
    }

    pub fn transform_input(&self) -> &ResultPanel {
        &self.transform_input
    }

    pub fn transform_input_mut(&mut self) -> &mut ResultPanel {
        &mut self.transform_input
    }

    pub fn transform_result(&self) -> &ResultPanel {
        &self.transform
    }

    pub fn transform_result_mut(&mut self) -> &mut ResultPanel {
        &mut self.transform
    }

    pub fn docs(&self) -> &DocViewer {
        &self.docs
    }

    pub fn docs_mut(&mut self) -> &mut DocViewer {
        &mut self.docs
    }

    pub fn is_busy(&self) -> bool {
        self.parse_tickets.active().is_some() || self.transform_tickets.active().is_some()
    }

    pub fn begin_parse(&mut self) -> ParseJob {
        self.parse.error = None;
        let ticket = self.parse_tickets.issue();
        tracing::debug!(target: "wp_workbench::session", ticket = ticket.id(), "parse started");
        ParseJob {
            ticket,
            request: ParseRequest {
                connection_id: self.connection_id,
                rules: self.rules.clone(),
                logs: self.logs.clone(),
            },
        }
    }

    /// Apply a parse response. A successful parse also becomes the input
    /// shown on the convert page. Returns false for stale tickets.
    pub fn finish_parse(
        &mut self,
        ticket: RequestTicket,
        result: Result<RecordResponse, WorkbenchError>,
    ) -> bool {
        if !self.parse_tickets.settle(ticket) {
            tracing::debug!(target: "wp_workbench::session", ticket = ticket.id(), "stale parse response ignored");
            return false;
        }
        match result {
            Ok(record) => {
                self.transform_input.set_record(RecordResponse {
                    fields: record.fields.clone(),
                    format_json: String::new(),
                });
                self.parse.set_record(record);
            }
            Err(err) => {
                tracing::warn!(target: "wp_workbench::session", error = %err, "parse failed");
                self.parse.error = Some(err.to_failure(Operation::Parse));
            }
        }
        true
    }

    /// Fill every input with the sample and start parsing it.
    pub fn load_sample(&mut self) -> ParseJob {
        self.logs = SAMPLE_LOG.to_string();
        self.rules = SAMPLE_RULE.to_string();
        self.oml = SAMPLE_OML.to_string();
        self.begin_parse()
    }

    /// Reset inputs and results on both pages. Outstanding responses are
    /// dropped when they arrive.
    pub fn clear(&mut self) {
        self.logs.clear();
        self.rules.clear();
        self.oml.clear();
        self.parse.clear();
        self.transform_input.clear();
        self.transform.clear();
        self.parse_tickets.cancel();
        self.transform_tickets.cancel();
    }

    pub fn begin_transform(&mut self) -> Result<TransformJob, WorkbenchError> {
        if self.oml.is_empty() {
            tracing::warn!(target: "wp_workbench::session", "transform without OML");
            return Err(WorkbenchError::OmlRequired);
        }
        self.transform.error = None;
        let ticket = self.transform_tickets.issue();
        tracing::debug!(target: "wp_workbench::session", ticket = ticket.id(), "transform started");
        Ok(TransformJob {
            ticket,
            request: TransformRequest::new(self.connection_id, self.oml.clone()),
        })
    }

    /// Apply a transform response. A failure also clears the previous
    /// result. Returns false for stale tickets.
    pub fn finish_transform(
        &mut self,
        ticket: RequestTicket,
        result: Result<RecordResponse, WorkbenchError>,
    ) -> bool {
        if !self.transform_tickets.settle(ticket) {
            tracing::debug!(target: "wp_workbench::session", ticket = ticket.id(), "stale transform response ignored");
            return false;
        }
        match result {
            Ok(record) => self.transform.set_record(record),
            Err(err) => {
                tracing::warn!(target: "wp_workbench::session", error = %err, "transform failed");
                self.transform.record = None;
                self.transform.error = Some(err.to_failure(Operation::Transform));
            }
        }
        true
    }

    pub async fn run_parse(&mut self, engine: &impl RemoteEngine) -> bool {
        let job = self.begin_parse();
        let result = engine.parse(&job.request).await;
        self.finish_parse(job.ticket, result)
    }

    pub async fn run_sample(&mut self, engine: &impl RemoteEngine) -> bool {
        let job = self.load_sample();
        let result = engine.parse(&job.request).await;
        self.finish_parse(job.ticket, result)
    }

    pub async fn run_transform(
        &mut self,
        engine: &impl RemoteEngine,
    ) -> Result<bool, WorkbenchError> {
        let job = self.begin_transform()?;
        let result = engine.transform(&job.request).await;
        Ok(self.finish_transform(job.ticket, result))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn panels_fold_by_indentation() {
        for panel in Panel::ALL {
            let EngineOptions::Studio(options) = panel.engine_options() else {
                panic!("{panel:?} should use the studio engine");
            };
            assert!(options.folding);
            assert!(!options.line_numbers);
        }
    }

    fn record(fields: &[(&str, serde_json::Value)]) -> RecordResponse {
        RecordResponse {
            fields: fields
                .iter()
                .enumerate()
                .map(|(i, (name, value))| ParsedField {
                    no: i as u32 + 1,
                    meta: "chars".into(),
                    name: name.to_string(),
                    value: value.clone(),
                })
                .collect(),
            format_json: String::new(),
        }
    }

    #[test]
    fn sample_fills_every_input() {
        let mut bench = Workbench::new();
        let job = bench.load_sample();
        assert_eq!(job.request.logs, SAMPLE_LOG);
        assert_eq!(job.request.rules, SAMPLE_RULE);
        assert_eq!(bench.text(Panel::Oml), SAMPLE_OML);
        assert!(bench.is_busy());
    }

    #[test]
    fn parse_seeds_convert_page() {
        let mut bench = Workbench::new();
        let job = bench.begin_parse();
        let mut parsed = record(&[("sip", json!("1.2.3.4"))]);
        parsed.format_json = r#"{"sip":"1.2.3.4"}"#.into();
        assert!(bench.finish_parse(job.ticket, Ok(parsed)));
        assert_eq!(bench.transform_input().visible_fields().len(), 1);
        assert_eq!(
            bench.parse_result().rendered_json().as_deref(),
            Some("{\n  \"sip\": \"1.2.3.4\"\n}")
        );
        assert!(!bench.is_busy());
    }

    #[test]
    fn newer_parse_wins() {
        let mut bench = Workbench::new();
        let first = bench.begin_parse();
        let second = bench.begin_parse();
        assert!(bench.finish_parse(second.ticket, Ok(record(&[("b", json!("2"))]))));
        assert!(!bench.finish_parse(first.ticket, Ok(record(&[("a", json!("1"))]))));
        let names: Vec<&str> = bench
            .parse_result()
            .visible_fields()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, ["b"]);
    }

    #[test]
    fn show_empty_toggle() {
        let mut bench = Workbench::new();
        let job = bench.begin_parse();
        bench.finish_parse(
            job.ticket,
            Ok(record(&[
                ("a", json!("x")),
                ("b", json!("")),
                ("c", serde_json::Value::Null),
                ("d", json!(0)),
            ])),
        );
        assert_eq!(bench.parse_result().visible_fields().len(), 4);
        bench.parse_result_mut().view.show_empty = false;
        let names: Vec<&str> = bench
            .parse_result()
            .visible_fields()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, ["a", "d"]);

        let rendered = bench.parse_result().rendered_json().expect("json");
        assert!(rendered.contains("\"a\""));
        assert!(!rendered.contains("\"b\""));
    }

    #[test]
    fn unparseable_format_json_is_shown_verbatim() {
        let mut bench = Workbench::new();
        let job = bench.begin_parse();
        let mut parsed = record(&[]);
        parsed.format_json = "not json".into();
        bench.finish_parse(job.ticket, Ok(parsed));
        assert_eq!(bench.parse_result().rendered_json().as_deref(), Some("not json"));
    }

    #[test]
    fn transform_requires_oml() {
        let mut bench = Workbench::new();
        assert!(matches!(
            bench.begin_transform(),
            Err(WorkbenchError::OmlRequired)
        ));
        bench.set_text(Panel::Oml, "x = take();");
        let job = bench.begin_transform().expect("job");
        assert_eq!(job.request.oml, "x = take();");
    }

    #[test]
    fn transform_failure_replaces_result() {
        let mut bench = Workbench::new();
        bench.set_text(Panel::Oml, "x = take();");
        let job = bench.begin_transform().expect("job");
        bench.finish_transform(job.ticket, Ok(record(&[("x", json!("1"))])));
        let job = bench.begin_transform().expect("job");
        let failure = RemoteFailure {
            message: "no parse result".into(),
            code: Some("NO_PARSE_RESULT".into()),
            details: None,
        };
        bench.finish_transform(job.ticket, Err(WorkbenchError::Remote(failure.clone())));
        assert!(bench.transform_result().record().is_none());
        assert_eq!(bench.transform_result().error(), Some(&failure));
    }

    #[test]
    fn clear_drops_in_flight_responses() {
        let mut bench = Workbench::new();
        let job = bench.load_sample();
        bench.clear();
        assert!(!bench.finish_parse(job.ticket, Ok(record(&[("a", json!("1"))]))));
        assert!(bench.parse_result().record().is_none());
        for panel in Panel::ALL {
            assert_eq!(bench.text(panel), "");
        }
    }

    #[test]
    fn tab_titles() {
        let mut bench = Workbench::new();
        assert_eq!(bench.tab(), Tab::Parse);
        bench.set_tab(Tab::Knowledge);
        assert_eq!(bench.tab().title(), "Help center");
    }
}
