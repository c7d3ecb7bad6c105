//! Drives a [`DragController`] from a recorded list of host events.
//!
//! The replay plays the part of the host: it hit-tests presses against the
//! current crop, feeds emitted rectangles back in as the new crop prop, and
//! drains the idle queue when the script says the event loop went idle.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use crop_config::CropConfig;
use crop_types::{Orientation, ParseOrientationError, Rect, Vec2};
use crop_widget::{CropCallbacks, CropProps, DragController, PointerButton, hit_test};
use serde::{Deserialize, Serialize};
use shared::{CountingListeners, IdleQueue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Step {step}: {source}")]
    Orientation {
        step: usize,
        #[source]
        source: ParseOrientationError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    #[default]
    Primary,
    Secondary,
    Middle,
}

impl From<Button> for PointerButton {
    fn from(button: Button) -> Self {
        match button {
            Button::Primary => PointerButton::Primary,
            Button::Secondary => PointerButton::Secondary,
            Button::Middle => PointerButton::Middle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// `ord` is the tag of the pressed element. Without it the press is
    /// hit-tested against the current crop.
    Press {
        x: f32,
        y: f32,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        ord: Option<String>,
    },
    Move {
        x: f32,
        y: f32,
    },
    Release {
        x: f32,
        y: f32,
    },
    Props {
        #[serde(default)]
        speed: Option<f32>,
        #[serde(default)]
        offset: Option<Vec2>,
    },
    Idle,
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    pub rect: Rect,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    ResizeStart { ord: Option<Orientation> },
    Resize { rect: Rect },
    ResizeEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub notifications: Vec<Notification>,
    pub final_rect: Rect,
    pub listeners_active: usize,
}

fn callbacks(log: &Rc<RefCell<Vec<Notification>>>, crop: &Rc<RefCell<Rect>>) -> CropCallbacks {
    let (start_log, resize_log, end_log) = (log.clone(), log.clone(), log.clone());
    let crop = crop.clone();

    CropCallbacks::new()
        .with_on_resize_start(move |ord| {
            start_log
                .borrow_mut()
                .push(Notification::ResizeStart { ord })
        })
        .with_on_resize(move |rect| {
            *crop.borrow_mut() = rect;
            resize_log.borrow_mut().push(Notification::Resize { rect });
        })
        .with_on_resize_end(move || end_log.borrow_mut().push(Notification::ResizeEnd))
}

pub fn run(script: &Script, config: &CropConfig) -> Result<Outcome, ReplayError> {
    let listeners = Rc::new(CountingListeners::new());
    let queue = Rc::new(IdleQueue::new());
    let log = Rc::new(RefCell::new(Vec::new()));
    let crop = Rc::new(RefCell::new(script.rect));

    let mut props = CropProps::from_config(script.rect, config);
    let mut controller = Some(
        DragController::from_config(script.rect, config, listeners.clone(), queue.clone())
            .with_callbacks(callbacks(&log, &crop)),
    );

    for (index, step) in script.steps.iter().enumerate() {
        let step_no = index + 1;

        // Host re-render: the latest emitted rectangle becomes the crop prop.
        let current = *crop.borrow();
        if current != props.rect {
            props.rect = current;
            if let Some(controller) = controller.as_mut() {
                controller.on_props_change(props);
            }
        }

        match step {
            Step::Idle => {
                let ran = queue.run_pending();
                tracing::debug!("step {step_no}: idle turn ran {ran} task(s)");
                continue;
            }
            Step::Teardown => {
                if let Some(mut controller) = controller.take() {
                    controller.teardown();
                }
                continue;
            }
            _ => {}
        }

        let Some(controller) = controller.as_mut() else {
            tracing::warn!("step {step_no}: crop already torn down, skipping {step:?}");
            continue;
        };

        match step {
            Step::Press { x, y, button, ord } => {
                let pointer = Vec2::new(*x, *y);
                let orientation = match ord {
                    Some(tag) => Some(tag.parse::<Orientation>().map_err(|source| {
                        ReplayError::Orientation {
                            step: step_no,
                            source,
                        }
                    })?),
                    None => hit_test(
                        props.rect,
                        pointer,
                        config.handle_hit_size,
                        config.drag_bars,
                    )
                    .orientation(),
                };
                controller.on_press_start(pointer, (*button).into(), orientation);
            }
            Step::Move { x, y } => {
                controller.on_pointer_move(Vec2::new(*x, *y));
            }
            Step::Release { x, y } => {
                controller.on_press_end(Vec2::new(*x, *y));
            }
            Step::Props { speed, offset } => {
                if let Some(speed) = speed {
                    props.speed = *speed;
                }
                if let Some(offset) = offset {
                    props.viewport_offset = *offset;
                }
                controller.on_props_change(props);
            }
            Step::Idle | Step::Teardown => {}
        }
    }

    // Whatever the script left running is torn down with the host.
    drop(controller);
    queue.run_pending();

    let notifications = log.borrow().clone();
    let final_rect = *crop.borrow();

    Ok(Outcome {
        notifications,
        final_rect,
        listeners_active: listeners.active(),
    })
}
