use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use wp_editor_core::{EditorHost, HostProps, InputEvent, Surface};
use wp_workbench::api::Operation;
use wp_workbench::sample::{SAMPLE_LOG, SAMPLE_OML};
use wp_workbench::{
    ParseRequest, ParsedField, Panel, RecordResponse, RemoteEngine, RemoteFailure,
    TransformRequest, VersionInfo, Workbench, WorkbenchError,
};

/// Engine double that remembers the last parsed logs, like the real one
/// remembers the last parsed record.
#[derive(Default)]
struct FakeEngine {
    last_parse: RefCell<Option<ParseRequest>>,
    transforms: RefCell<Vec<TransformRequest>>,
}

impl RemoteEngine for FakeEngine {
    async fn parse(&self, request: &ParseRequest) -> Result<RecordResponse, WorkbenchError> {
        *self.last_parse.borrow_mut() = Some(request.clone());
        if request.rules.is_empty() {
            return Err(WorkbenchError::Remote(RemoteFailure {
                message: "rule is empty".into(),
                code: Some("EMPTY_RULE".into()),
                details: None,
            }));
        }
        let sip = request.logs.split(' ').next().unwrap_or_default();
        Ok(RecordResponse {
            fields: vec![
                ParsedField {
                    no: 1,
                    meta: "ip".into(),
                    name: "sip".into(),
                    value: json!(sip),
                },
                ParsedField {
                    no: 2,
                    meta: "chars".into(),
                    name: "referer".into(),
                    value: json!(""),
                },
            ],
            format_json: format!(r#"{{"sip":"{sip}"}}"#),
        })
    }

    async fn transform(
        &self,
        request: &TransformRequest,
    ) -> Result<RecordResponse, WorkbenchError> {
        self.transforms.borrow_mut().push(request.clone());
        if self.last_parse.borrow().is_none() {
            return Err(WorkbenchError::Remote(RemoteFailure::new(
                Operation::Transform.default_message(),
            )));
        }
        Ok(RecordResponse {
            fields: vec![ParsedField {
                no: 1,
                meta: "ip".into(),
                name: "src_ip".into(),
                value: json!("222.133.52.20"),
            }],
            format_json: String::new(),
        })
    }

    async fn version(&self) -> Result<VersionInfo, WorkbenchError> {
        Ok(VersionInfo {
            wp_editer: "0.1.0".into(),
            warp_engine: "0.9.0".into(),
        })
    }
}

#[tokio::test]
async fn sample_then_transform() {
    let engine = FakeEngine::default();
    let mut bench = Workbench::new();

    assert!(bench.run_sample(&engine).await);
    let parsed = bench.parse_result().record().expect("parsed");
    assert_eq!(parsed.fields[0].value, json!("222.133.52.20"));
    assert_eq!(bench.transform_input().visible_fields().len(), 2);

    bench.transform_input_mut().view.show_empty = false;
    assert_eq!(bench.transform_input().visible_fields().len(), 1);

    assert!(bench.run_transform(&engine).await.expect("oml present"));
    let transformed = bench.transform_result().record().expect("transformed");
    assert_eq!(transformed.fields[0].name, "src_ip");

    let sent = engine.transforms.borrow();
    assert_eq!(sent[0].oml, SAMPLE_OML);
    assert_eq!(sent[0].parse_result, json!({}));
}

#[tokio::test]
async fn parse_failure_is_kept_for_display() {
    let engine = FakeEngine::default();
    let mut bench = Workbench::new();
    bench.set_text(Panel::Logs, "1.2.3.4 - -");
    assert!(bench.run_parse(&engine).await);
    let failure = bench.parse_result().error().expect("failure");
    assert_eq!(failure.message, "rule is empty");
    assert_eq!(failure.code.as_deref(), Some("EMPTY_RULE"));
}

#[tokio::test]
async fn transform_without_oml_never_reaches_the_engine() {
    let engine = FakeEngine::default();
    let mut bench = Workbench::new();
    let err = bench.run_transform(&engine).await.expect_err("no oml");
    assert_eq!(err.to_string(), "please fill in the OML rule first");
    assert!(engine.transforms.borrow().is_empty());
}

#[tokio::test]
async fn version_label() {
    let engine = FakeEngine::default();
    let info = engine.version().await.expect("version");
    assert_eq!(info.label(), "wp-editer 0.1.0 / warp-engine 0.9.0");
}

#[test]
fn panels_are_controlled_editors() {
    let bench = Rc::new(RefCell::new(Workbench::new()));
    let mut host = EditorHost::new(Some(Surface::new("logs")));
    let sink = bench.clone();
    let initial = bench.borrow().text(Panel::Logs).to_string();
    host.mount(
        HostProps::new(initial, Panel::Logs.engine_options())
            .on_change(move |text: &str| sink.borrow_mut().set_text(Panel::Logs, text)),
    )
    .expect("mount");

    host.dispatch_input(InputEvent::insert("10.0.0.1 -"))
        .expect("input");
    assert_eq!(bench.borrow().text(Panel::Logs), "10.0.0.1 -");

    // The parent re-renders with the text the user just typed.
    let echoed = bench.borrow().text(Panel::Logs).to_string();
    assert_eq!(host.set_props(&echoed), Ok(false));

    // Loading the sample pushes new content into the editor.
    bench.borrow_mut().load_sample();
    let value = bench.borrow().text(Panel::Logs).to_string();
    assert_eq!(host.set_props(&value), Ok(true));
    assert_eq!(host.handle().get_value().as_deref(), Ok(SAMPLE_LOG));
    assert_eq!(bench.borrow().text(Panel::Logs), SAMPLE_LOG);
}
