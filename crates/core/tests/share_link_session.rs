//! Integration test: decode a custom share link, edit the structure, attach
//! analysis results and render it, then write the link back out.

use trussview_core::api::{AnalysisRequest, parse_analysis};
use trussview_core::svg::{ThemeMode, render_svg};
use trussview_core::{
    DecodePolicy, ForceGradient, Member, Node, RenderOptions, ShareState, SupportType,
    TrussCanvas, TrussSession,
};
use trussview_protocol::{Frame, RenderCommand};

const LINK: &str = "?cat=custom&cnodes=0~0~p~0~0_10~5~f~-2~3&cmems=0~1~2~29000";

fn inside(frame: &Frame, x: f64, y: f64) -> bool {
    (0.0..=frame.width).contains(&x) && (0.0..=frame.height).contains(&y)
}

#[test]
fn two_node_link_to_scene_and_back() {
    let state = ShareState::from_query(LINK, DecodePolicy::Strict).expect("link should decode");
    assert!(state.warnings.is_empty());
    assert_eq!(
        state.nodes,
        vec![
            Node::new(0.0, 0.0).with_support(SupportType::Pin),
            Node::new(10.0, 5.0).with_load(-2.0, 3.0),
        ]
    );
    assert_eq!(state.members, vec![Member::new(0, 1, 2.0, 29000.0)]);

    let mut session = TrussSession::new(state.custom_model());
    let request = serde_json::to_value(AnalysisRequest::from_model(session.model()))
        .expect("request should serialize");
    assert_eq!(request["nodes"][1]["Fx"], -2.0);
    assert_eq!(request["nodes"][1]["Fy"], -3.0);
    assert_eq!(request["nodes"][0]["support"], "pin");

    let analysis = parse_analysis(
        r#"{
            "success": true,
            "isStable": true,
            "memberResults": [{"index": 0, "start": 0, "end": 1, "length": 11.18, "axial": -3.6}]
        }"#,
    )
    .expect("analysis should parse");
    assert!(analysis.is_usable());
    let summary = session
        .attach_forces(&analysis.axial_forces(), ForceGradient::default())
        .copied()
        .expect("one force per member");
    assert_eq!(summary.min, -3.6);
    assert_eq!(summary.max, -3.6);

    let frame = Frame::new(900.0, 300.0);
    let scene = TrussCanvas::default().render(
        session.model(),
        session.overlay(),
        &frame,
        &RenderOptions::default(),
    );
    let transform = scene.transform.expect("scene should be laid out");
    for node in session.model().nodes() {
        let p = transform.to_screen(node.x, node.y);
        assert!(inside(&frame, p.x, p.y), "node at {p:?} left the frame");
    }
    for cmd in &scene.commands {
        if let RenderCommand::DrawCircle { center, .. } = cmd {
            assert!(inside(&frame, center.x, center.y));
        }
    }
    let svg = render_svg(&scene.commands, &frame, ThemeMode::Light);
    assert!(svg.contains(r#"id="legend-bar""#));

    // Editing invalidates the overlay and the edit shows up in the link.
    session
        .add_node(Node::new(20.0, 0.0).with_support(SupportType::Roller))
        .expect("finite node");
    session
        .add_member(Member::new(1, 2, 2.0, 29000.0))
        .expect("valid member");
    assert!(session.overlay().is_none());

    let query = ShareState::from_custom_model(session.model()).to_query();
    let back = ShareState::from_query(&query, DecodePolicy::Strict).expect("round trip");
    assert_eq!(back.custom_model(), *session.model());
}

#[test]
fn removing_a_node_keeps_the_link_consistent() {
    let state = ShareState::from_query(
        "cnodes=0~0~p~0~0_5~5~f~0~-10_10~0~r~0~0&cmems=0~1~1~1_1~2~1~1_0~2~1~1",
        DecodePolicy::Strict,
    )
    .expect("link should decode");
    let mut session = TrussSession::new(state.custom_model());
    session.remove_node(1).expect("node exists");

    let model = session.model();
    assert_eq!(model.node_count(), 2);
    assert_eq!(model.members(), &[Member::new(0, 1, 1.0, 1.0)]);
    let query = ShareState::from_custom_model(model).to_query();
    assert!(query.contains("cmems=0%7E1%7E1%7E1"));
}

#[test]
fn lenient_links_render_what_they_can() {
    let state = ShareState::from_query(
        "cnodes=0~0~p~0~0_oops_4~0~r~0~0&cmems=0~2~1~1_0~9~1~1",
        DecodePolicy::Lenient,
    )
    .expect("lenient decoding never fails");
    assert_eq!(state.warnings.len(), 1);
    let model = state.custom_model();
    assert_eq!(model.node_count(), 3);
    assert_eq!(model.member_count(), 1);

    let scene = TrussCanvas::default().render(
        &model,
        None,
        &Frame::new(400.0, 200.0),
        &RenderOptions::default(),
    );
    assert!(!scene.is_empty());
}
