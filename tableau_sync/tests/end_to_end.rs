// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Project mutations flowing through the engine to a presenter.

use kurbo::Point;
use serde_json::{Value, json};
use tableau_core::NodeId;
use tableau_core::backend::Presenter;
use tableau_core::context::RenderContext;
use tableau_core::message::HostMessage;
use tableau_core::pose::{Pose, PoseUpdate};
use tableau_core::props::Props;
use tableau_core::time::HostTime;
use tableau_sync::interaction::DragSession;
use tableau_sync::project::RemoteOutcome;
use tableau_sync::store::MemoryLayerStore;
use tableau_sync::wire::{Layer, LayerAction, LayerEvent, RequestMetadata};
use tableau_sync::{CompositorProject, RenderHandle, render_project};

#[derive(Debug, Default)]
struct RecordingPresenter {
    applied: Vec<(NodeId, NodeId, PoseUpdate)>,
    detached: Vec<(NodeId, NodeId)>,
}

impl Presenter for RecordingPresenter {
    fn apply(&mut self, container: &NodeId, child: &NodeId, update: &PoseUpdate) {
        self.applied.push((container.clone(), child.clone(), *update));
    }

    fn detach(&mut self, container: &NodeId, child: &NodeId) {
        self.detached.push((container.clone(), child.clone()));
    }
}

impl RecordingPresenter {
    fn for_child(&self, child: &NodeId) -> Vec<(NodeId, PoseUpdate)> {
        self.applied
            .iter()
            .filter(|(_, c, _)| c == child)
            .map(|(container, _, u)| (container.clone(), *u))
            .collect()
    }

    fn clear(&mut self) {
        self.applied.clear();
        self.detached.clear();
    }
}

fn props(value: Value) -> Props {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn ms(millis: u64) -> HostTime {
    HostTime::from_millis(millis)
}

struct Stage {
    project: CompositorProject<MemoryLayerStore>,
    handle: RenderHandle,
    out: RecordingPresenter,
}

impl Stage {
    /// A project whose root lays its children out in a row.
    fn new() -> Self {
        let mut project =
            CompositorProject::new("show", MemoryLayerStore::new()).with_connection_id("local");
        let root = project.root().clone();
        project
            .update(&root, &props(json!({ "layout": "Row" })))
            .unwrap();
        let handle = render_project(&mut project, RenderContext::default());
        Self {
            project,
            handle,
            out: RecordingPresenter::default(),
        }
    }

    fn root(&self) -> NodeId {
        self.project.root().clone()
    }

    fn sync_and_tick(&mut self, at: u64) {
        self.handle.sync(&mut self.project);
        self.handle.tick(&mut self.out, ms(at));
    }

    /// Runs frames until every entering child has settled.
    fn settle(&mut self, from: u64) {
        for at in [from, from + 16, from + 2_000] {
            self.sync_and_tick(at);
        }
    }
}

#[test]
fn inserted_node_reaches_presenter() {
    let mut stage = Stage::new();
    stage.settle(0);
    let cam = stage.project.insert(Props::new(), None, None).unwrap();

    assert_eq!(stage.handle.sync(&mut stage.project), 1);
    let outcome = stage.handle.tick(&mut stage.out, ms(3_000));
    assert_eq!(outcome.report().unwrap().inserted, 1);

    let updates = stage.out.for_child(&cam);
    assert_eq!(updates.len(), 1, "entry pose only on the first frame");
    assert_eq!(updates[0].0, stage.root());
    assert!(updates[0].1.is_snap());

    stage.handle.tick(&mut stage.out, ms(3_016));
    let updates = stage.out.for_child(&cam);
    assert_eq!(updates.len(), 2);
    assert!(!updates[1].1.is_snap(), "later entries animate");
    assert_eq!(updates[1].1.pose.opacity, 1.0);
}

#[test]
fn own_echo_is_not_laid_out_again() {
    let mut stage = Stage::new();
    stage.project.insert(Props::new(), None, None).unwrap();
    stage.settle(0);
    stage.out.clear();

    let echoes = stage.project.store().events();
    assert!(!echoes.is_empty());
    for event in &echoes {
        assert_eq!(stage.project.apply_remote(event), RemoteOutcome::Echo);
    }
    assert_eq!(stage.handle.sync(&mut stage.project), 0);
    let outcome = stage.handle.tick(&mut stage.out, ms(5_000));
    assert!(outcome.report().unwrap().laid_out.is_empty());
    assert!(stage.out.applied.is_empty());
}

#[test]
fn foreign_change_is_merged_and_rendered() {
    let mut stage = Stage::new();
    stage.settle(0);
    let root = stage.root();
    let guest = NodeId::from("guest");
    let event = LayerEvent::batch(
        "show",
        vec![
            LayerAction::CreateLayer {
                layer: Layer::new(guest.clone(), Props::new(), Vec::new()),
            },
            LayerAction::UpdateLayer {
                layer: Layer::new(root.clone(), props(json!({ "layout": "Row" })), vec![
                    guest.clone(),
                ]),
            },
        ],
        Some(RequestMetadata {
            connection_id: "remote".to_owned(),
            layout_id: "show".to_owned(),
        }),
    );
    assert!(matches!(
        stage.project.apply_remote(&event),
        RemoteOutcome::Applied { .. }
    ));
    stage.sync_and_tick(3_000);
    assert_eq!(stage.out.for_child(&guest).len(), 1);
    assert!(
        stage.project.store().requests().iter().all(|r| r.metadata.connection_id == "local"),
        "merged remote changes are not written back"
    );
}

#[test]
fn abandoned_drag_removes_the_node() {
    let mut stage = Stage::new();
    let cam = stage.project.insert(Props::new(), None, None).unwrap();
    stage.settle(0);
    stage.out.clear();

    let drag = DragSession::start(stage.handle.context_mut(), cam.clone(), Point::ZERO);
    assert!(stage.handle.tick(&mut stage.out, ms(3_000)).is_deferred());

    drag.drop(stage.handle.context_mut(), &mut stage.project, None)
        .unwrap();
    assert!(!stage.project.tree().contains(&cam));
    stage.handle.sync(&mut stage.project);
    let outcome = stage.handle.tick(&mut stage.out, ms(3_016));
    assert_eq!(outcome.report().unwrap().removed, 1);
    assert!(stage.out.detached.is_empty(), "exit animation plays first");

    stage.handle.handle(HostMessage::TransitionEnded {
        container: stage.root(),
        child: cam.clone(),
    });
    stage.handle.tick(&mut stage.out, ms(3_032));
    stage.handle.tick(&mut stage.out, ms(3_048));
    assert_eq!(stage.out.detached, [(stage.root(), cam)]);
}

#[test]
fn move_between_columns_keeps_position() {
    let mut stage = Stage::new();
    let column = props(json!({ "layout": "Column" }));
    let left = stage.project.insert(column.clone(), None, None).unwrap();
    let right = stage.project.insert(column, None, None).unwrap();
    let cam = stage.project.insert(Props::new(), Some(&left), None).unwrap();
    stage.settle(0);
    let anchor = stage.handle.engine().root_offset(&cam).expect("cam settled");
    stage.out.clear();

    stage.project.move_node(&cam, &right, None).unwrap();
    stage.sync_and_tick(3_000);

    let first = stage.out.for_child(&cam);
    assert_eq!(first.len(), 1);
    let (container, update) = &first[0];
    assert_eq!(*container, right);
    assert!(update.is_snap());
    let offset = stage.handle.engine().global_offset(&right);
    assert_eq!(update.pose.position, anchor - offset);
    assert_eq!(update.pose.scale, Pose::UNIT_SCALE);
    assert_eq!(stage.out.detached, [(left, cam)]);
}

#[test]
fn dropping_the_layout_detaches_its_children() {
    let mut stage = Stage::new();
    let row = stage
        .project
        .insert(props(json!({ "layout": "Row" })), None, None)
        .unwrap();
    let cam = stage.project.insert(Props::new(), Some(&row), None).unwrap();
    stage.settle(0);
    assert_eq!(stage.out.for_child(&cam)[0].0, row);
    stage.out.clear();

    stage
        .project
        .update(&row, &props(json!({ "layout": null })))
        .unwrap();
    stage.sync_and_tick(3_000);
    assert!(stage.handle.engine().container(&row).is_none());
    assert_eq!(stage.out.detached, [(row.clone(), cam.clone())]);

    stage.handle.tick(&mut stage.out, ms(3_016));
    stage.handle.tick(&mut stage.out, ms(6_000));
    assert_eq!(stage.out.detached, [(row, cam)], "detached exactly once");
}

#[test]
fn nested_container_under_group_renders() {
    let mut stage = Stage::new();
    let group = stage.project.insert(Props::new(), None, None).unwrap();
    let grid = stage
        .project
        .insert(props(json!({ "layout": "Grid" })), Some(&group), None)
        .unwrap();
    let cam = stage.project.insert(Props::new(), Some(&grid), None).unwrap();
    stage.settle(0);

    let updates = stage.out.for_child(&cam);
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].0, grid);
}

#[test]
fn dispose_detaches_everything() {
    let mut stage = Stage::new();
    let a = stage.project.insert(Props::new(), None, None).unwrap();
    let b = stage.project.insert(Props::new(), None, None).unwrap();
    stage.settle(0);

    let Stage {
        handle, mut out, ..
    } = stage;
    out.clear();
    handle.dispose(&mut out);
    assert_eq!(out.detached.len(), 2);
    assert!(out.detached.iter().any(|(_, c)| *c == a));
    assert!(out.detached.iter().any(|(_, c)| *c == b));
}
