use std::path::PathBuf;
use std::sync::Mutex;

use image::{Rgba, RgbaImage};
use maskedit::config::AppConfig;
use maskedit::geometry::Point;
use maskedit::restore::{RestoreCommand, RestoreError, RestoreResult, Restorer};
use maskedit::session::{EditorCommand, StrokeEnd};
use maskedit::{AppError, AppResult, EditorSession, SessionOptions};

const MARKED: Rgba<u8> = Rgba([200, 40, 40, 255]);

/// Paints every masked pixel and counts calls.
struct PaintingRestorer {
    calls: Mutex<usize>,
}

impl PaintingRestorer {
    fn new() -> Self {
        Self {
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().expect("calls lock")
    }
}

impl Restorer for PaintingRestorer {
    fn restore(&self, image: &RgbaImage, mask: &RgbaImage) -> RestoreResult<RgbaImage> {
        *self.calls.lock().expect("calls lock") += 1;
        let mut restored = image.clone();
        for (x, y, pixel) in mask.enumerate_pixels() {
            if pixel.0[3] == 255 {
                restored.put_pixel(x, y, MARKED);
            }
        }
        Ok(restored)
    }
}

struct FailingRestorer;

impl Restorer for FailingRestorer {
    fn restore(&self, _image: &RgbaImage, _mask: &RgbaImage) -> RestoreResult<RgbaImage> {
        Err(RestoreError::Rejected {
            message: "service unavailable".to_string(),
        })
    }
}

fn image_i() -> RgbaImage {
    RgbaImage::from_pixel(80, 60, Rgba([30, 30, 30, 255]))
}

fn image_j() -> RgbaImage {
    RgbaImage::from_pixel(50, 40, Rgba([90, 120, 150, 255]))
}

fn session(auto_mode: bool) -> EditorSession {
    EditorSession::new(
        image_i(),
        SessionOptions {
            brush_radius: 5,
            auto_mode,
            ..SessionOptions::default()
        },
    )
}

fn stroke(session: &mut EditorSession, from: Point, to: Point) -> StrokeEnd {
    assert!(session.start_stroke(from).expect("stroke start in surface"));
    assert!(session.move_stroke(to).expect("stroke move in surface"));
    session.end_stroke().expect("stroke should end")
}

fn stroke_and_restore(session: &mut EditorSession, restorer: &PaintingRestorer) {
    let StrokeEnd::Submit(ticket) = stroke(session, Point::new(10.0, 10.0), Point::new(40.0, 10.0))
    else {
        panic!("auto mode should submit on stroke end");
    };
    session
        .run_ticket(ticket, restorer)
        .expect("restoration should apply");
}

#[test]
fn scenario_a_auto_mode_stroke_appends_one_edit() {
    let restorer = PaintingRestorer::new();
    let mut session = session(true);
    session.load_source(image_i());

    stroke_and_restore(&mut session, &restorer);

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history.cursor(), 1);
    assert!(history.entries()[0].is_original());
    assert_eq!(history.entries()[0].image(), &image_i());
    assert!(!history.entries()[1].is_original());
    assert_eq!(*session.display_image().get_pixel(20, 10), MARKED);
    assert!(!session.mask().has_content());
    assert_eq!(restorer.calls(), 1);
}

#[test]
fn scenario_b_new_edit_after_undo_replaces_the_redo_branch() {
    let restorer = PaintingRestorer::new();
    let mut session = session(true);
    stroke_and_restore(&mut session, &restorer);
    let first_edit = session.history().current().id();

    assert!(session.undo());
    assert_eq!(session.history().cursor(), 0);
    assert_eq!(session.display_image(), &image_i());

    let StrokeEnd::Submit(ticket) =
        stroke(&mut session, Point::new(30.0, 40.0), Point::new(60.0, 40.0))
    else {
        panic!("auto mode should submit on stroke end");
    };
    session
        .run_ticket(ticket, &restorer)
        .expect("restoration should apply");

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history.cursor(), 1);
    assert!(history.position(first_edit).is_none());
    assert_eq!(*session.display_image().get_pixel(45, 40), MARKED);
    assert_eq!(*session.display_image().get_pixel(20, 10), Rgba([30, 30, 30, 255]));
}

#[test]
fn scenario_c_reload_discards_pending_manual_edits() {
    let restorer = PaintingRestorer::new();
    let mut session = session(false);
    assert!(matches!(
        stroke(&mut session, Point::new(5.0, 5.0), Point::new(15.0, 15.0)),
        StrokeEnd::Pending
    ));
    assert!(session.pending_edits());

    session.load_source(image_j());

    assert!(!session.pending_edits());
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().cursor(), 0);
    assert_eq!(session.display_image(), &image_j());
    assert!(!session.mask().has_content());
    assert_eq!(session.submit_with(&restorer).expect("empty submit"), None);
    assert_eq!(restorer.calls(), 0);
}

#[test]
fn scenario_d_failed_restoration_leaves_mask_and_history_intact() {
    let mut session = session(false);
    stroke(&mut session, Point::new(20.0, 20.0), Point::new(50.0, 30.0));
    let mask_before = session.mask().layer().clone();
    let len_before = session.history().len();

    let err = session
        .submit_with(&FailingRestorer)
        .expect_err("restoration should fail");

    assert!(matches!(
        err,
        maskedit::submission::SubmitError::Restore(RestoreError::Rejected { .. })
    ));
    assert_eq!(session.mask().layer(), &mask_before);
    assert_eq!(session.history().len(), len_before);
    assert!(!session.busy());
    assert!(session.pending_edits());
}

#[test]
fn empty_submit_changes_nothing() {
    let restorer = PaintingRestorer::new();
    let mut session = session(false);
    let mask_before = session.mask().layer().clone();
    assert_eq!(session.submit_with(&restorer).expect("no error"), None);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.mask().layer(), &mask_before);
    assert_eq!(restorer.calls(), 0);
}

#[test]
fn commands_convert_into_app_errors() {
    fn exit_zoom_twice(session: &mut EditorSession) -> AppResult<()> {
        session.apply(EditorCommand::ZoomIn)?;
        session.apply(EditorCommand::ExitZoom)?;
        session.apply(EditorCommand::ExitZoom)?;
        Ok(())
    }

    let mut session = session(true);
    let err = exit_zoom_twice(&mut session).expect_err("second exit is invalid");
    assert!(matches!(err, AppError::Mode(_)));
    assert_eq!(session.viewport().zoom_step(), 0);
}

#[test]
fn pending_restoration_can_be_polled_from_a_driver_loop() {
    use std::sync::Arc;

    let mut session = session(true);
    let StrokeEnd::Submit(ticket) =
        stroke(&mut session, Point::new(1.0, 1.0), Point::new(2.0, 2.0))
    else {
        panic!("auto mode should submit");
    };
    let pending = maskedit::worker::spawn_restoration(Arc::new(PaintingRestorer::new()), ticket);
    let mut polls = 0_u32;
    let result = loop {
        polls += 1;
        if let Some(result) = pending.try_take() {
            break result;
        }
        std::thread::sleep(maskedit::worker::RESTORATION_POLL_INTERVAL);
    };
    assert!(polls >= 1);
    session
        .finish_submit(pending.ticket(), result)
        .expect("polled result should apply");
    assert_eq!(session.history().len(), 2);
}

#[cfg(unix)]
#[test]
fn run_replay_writes_the_displayed_image() {
    let root: PathBuf =
        std::env::temp_dir().join(format!("maskedit-replay-{}", std::process::id()));
    std::fs::create_dir_all(&root).expect("scratch dir");
    let source = root.join("source.png");
    let script = root.join("script.json");
    let output = root.join("output.png");
    image_i().save(&source).expect("source should save");
    std::fs::write(
        &script,
        r#"[{"step": "stroke", "points": [[10, 10], [20, 10]]}, {"step": "brush", "radius": 2}]"#,
    )
    .expect("script should save");

    let config = AppConfig {
        restore_command: Some(RestoreCommand {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                r#"cp "$1" "$3""#.to_string(),
                "sh".to_string(),
            ],
        }),
        work_dir: Some(root.join("work")),
        ..AppConfig::default()
    };

    let report = maskedit::run_replay(&source, &script, &output, &config)
        .expect("replay should succeed");
    assert_eq!(report.submissions, 1);
    assert_eq!(report.failed_submissions, 0);
    let written = maskedit::imaging::load_rgba(&output).expect("output should decode");
    assert_eq!(written, image_i());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn run_replay_requires_a_restore_command() {
    let err = maskedit::run_replay(
        &PathBuf::from("missing.png"),
        &PathBuf::from("missing.json"),
        &PathBuf::from("out.png"),
        &AppConfig::default(),
    )
    .expect_err("no command configured");
    assert!(matches!(err, AppError::MissingRestoreCommand));
}
