//! End-to-end flows against the in-memory gateway.
//!
//! Each test drives the sessions the way a UI would: load, mutate, reload,
//! and assert on what the user would see afterwards.

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

use taskdeck::gateway::memory::MemoryGateway;
use taskdeck::gateway::{ProjectDraft, StoreGateway, SubtaskDraft, TaskDraft, TaskPatch};
use taskdeck::model::{Priority, Status, SyncState};
use taskdeck::ops::filter::{DateWindow, SortMode, StatusFilter};
use taskdeck::{Confirmation, ProjectDirectory, TaskBoard, TaskDetail};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Drafts with distinct priorities and due dates, for filter assertions.
fn draft(title: &str, priority: Priority) -> TaskDraft {
    TaskDraft {
        priority,
        ..TaskDraft::new(title)
    }
}

#[tokio::test]
async fn create_edit_complete_flow() {
    init_tracing();
    let gw = MemoryGateway::new();
    let mut board = TaskBoard::new(gw);
    board.load().await.unwrap();
    assert!(board.is_empty());

    let id = board
        .create_task(draft("Write report", Priority::High))
        .await
        .unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board.task(&id).unwrap().status, Status::Todo);

    board
        .update_task(
            &id,
            TaskPatch {
                status: Some(Status::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(board.task(&id).unwrap().status, Status::InProgress);

    board
        .update_task(
            &id,
            TaskPatch {
                status: Some(Status::Done),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(board.task(&id).unwrap().status, Status::Done);
}

#[tokio::test]
async fn filters_compose_and_never_touch_the_cache() {
    init_tracing();
    let gw = MemoryGateway::new();
    let mut board = TaskBoard::new(gw);
    board.load().await.unwrap();

    let urgent = board
        .create_task(TaskDraft {
            due_date: Some((Utc::now() - Duration::days(2)).date_naive()),
            ..draft("Urgent overdue", Priority::High)
        })
        .await
        .unwrap();
    let done = board
        .create_task(draft("Finished", Priority::Low))
        .await
        .unwrap();
    board
        .update_task(
            &done,
            TaskPatch {
                status: Some(Status::Done),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    board
        .create_task(draft("Someday", Priority::Medium))
        .await
        .unwrap();

    let now = Utc::now();
    assert_eq!(board.visible(now).len(), 3);

    board.criteria_mut().status = StatusFilter::Overdue;
    let overdue = board.visible(now);
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id, urgent);

    board.criteria_mut().status = StatusFilter::Pending;
    board.criteria_mut().search = "some".to_string();
    let hits = board.visible(now);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Someday");

    // The cache itself is untouched by any amount of filtering.
    board.criteria_mut().status = StatusFilter::All;
    board.criteria_mut().search.clear();
    assert_eq!(board.len(), 3);
    assert_eq!(board.visible(now).len(), 3);
}

#[tokio::test]
async fn drag_reorder_survives_a_reload() {
    init_tracing();
    let gw = MemoryGateway::new();
    let mut board = TaskBoard::new(gw);
    board.criteria_mut().sort = SortMode::Manual;
    board.load().await.unwrap();

    for title in ["first", "second", "third"] {
        board
            .create_task(draft(title, Priority::Medium))
            .await
            .unwrap();
    }

    let now = Utc::now();
    board.move_task(2, 0, now).await.unwrap();
    let titles: Vec<&str> = board.visible(now).iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "first", "second"]);

    // The bulk write landed, so a fresh load shows the same order.
    board.load().await.unwrap();
    let titles: Vec<&str> = board.visible(now).iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "first", "second"]);
    for task in board.visible(now) {
        assert_eq!(task.sync, SyncState::Synced);
    }
}

#[tokio::test]
async fn subtask_lifecycle_writes_the_audit_log() {
    init_tracing();
    let gw = MemoryGateway::new();
    let parent = gw.create_task(TaskDraft::new("Parent")).await.unwrap();

    let mut detail = TaskDetail::new(gw, parent.id.clone());
    detail.load().await.unwrap();
    assert_eq!(detail.history().len(), 1); // creation entry

    detail
        .add_subtask(SubtaskDraft::new("collect sources"))
        .await
        .unwrap();
    let sub = detail.task().unwrap().subtasks[0].id.clone();
    detail
        .set_subtask_status(&sub, Status::Done)
        .await
        .unwrap();
    detail
        .remove_subtask(&sub, Confirmation::Confirmed)
        .await
        .unwrap();

    assert!(detail.task().unwrap().subtasks.is_empty());
    let actions: Vec<&str> = detail.history().iter().map(|e| e.action.as_str()).collect();
    assert!(actions.contains(&"Subtask added"));

    detail.clear_history(Confirmation::Confirmed).await.unwrap();
    assert!(detail.history().is_empty());
}

#[tokio::test]
async fn deleting_a_project_unassigns_its_tasks() {
    init_tracing();
    let gw = MemoryGateway::new();
    let mut dir = ProjectDirectory::new(gw);
    let project = dir.create(ProjectDraft::new("Thesis")).await.unwrap();

    let task = dir
        .gateway()
        .create_task(TaskDraft {
            project: Some(project.clone()),
            ..TaskDraft::new("Chapter 1")
        })
        .await
        .unwrap();
    assert_eq!(task.project.as_ref(), Some(&project));

    dir.delete(&project, Confirmation::Confirmed).await.unwrap();
    assert!(dir.projects().is_empty());

    let survivor = dir.gateway().get_task(&task.id).await.unwrap();
    assert_eq!(survivor.project, None);
}

#[tokio::test]
async fn date_window_narrows_the_board() {
    init_tracing();
    let gw = MemoryGateway::new();
    let mut board = TaskBoard::new(gw);
    board.load().await.unwrap();
    board
        .create_task(draft("Fresh", Priority::Medium))
        .await
        .unwrap();

    let now = Utc::now();
    board.criteria_mut().window = DateWindow::Last24Hours;
    assert_eq!(board.visible(now).len(), 1);

    // Push "now" far past the creation moment and the task falls out.
    let later = now + Duration::days(3);
    assert!(board.visible(later).is_empty());
}

#[tokio::test]
async fn analytics_reflect_the_store() {
    init_tracing();
    let gw = MemoryGateway::new();
    let a = gw.create_task(draft("a", Priority::High)).await.unwrap();
    gw.create_task(draft("b", Priority::Low)).await.unwrap();
    gw.update_task(
        &a.id,
        TaskPatch {
            status: Some(Status::Done),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let summary = gw.analytics_summary().await.unwrap();
    assert_eq!(summary.total_tasks, 2);
    assert_eq!(summary.completed_tasks, 1);
    assert_eq!(summary.pending_tasks, 1);
    assert_eq!(summary.overdue_tasks, 0);

    let by_priority = gw.analytics_priority().await.unwrap();
    let high = by_priority.iter().find(|s| s.name == "High").unwrap();
    assert_eq!(high.value, 1);
}

#[tokio::test]
async fn remote_failures_surface_as_gateway_errors() {
    init_tracing();
    let gw = MemoryGateway::new().fail_on("list_tasks");
    let mut board = TaskBoard::new(gw);
    let err = board.load().await.unwrap_err();
    assert!(!err.is_validation());
    assert_eq!(board.len(), 0);
}

#[tokio::test]
async fn confirmation_everywhere_or_nothing_happens() {
    init_tracing();
    let gw = MemoryGateway::new();
    let task = gw.create_task(TaskDraft::new("keep me")).await.unwrap();
    gw.create_subtask(&task.id, SubtaskDraft::new("keep me too"))
        .await
        .unwrap();

    let mut board = TaskBoard::new(gw);
    board.load().await.unwrap();
    let calls_before = board.gateway().calls().len();

    board
        .delete_task(&task.id, Confirmation::Cancelled)
        .await
        .unwrap();
    assert_eq!(board.gateway().calls().len(), calls_before);
    assert_eq!(board.len(), 1);
}
