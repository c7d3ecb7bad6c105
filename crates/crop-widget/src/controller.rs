//! Pointer-drag state machine behind the crop rectangle.
//!
//! The host forwards presses, pointer moves, releases and prop updates; the
//! controller turns them into new rectangles and reports them through
//! [`CropCallbacks`]. It owns no rendering and no native event plumbing:
//! global listeners and deferred delivery go through the [`GlobalListeners`]
//! and [`Scheduler`] the host hands in.

use std::fmt;
use std::rc::Rc;

use crop_config::{CropConfig, ReconcileDelivery};
use crop_types::{Orientation, Rect, Vec2, resize_or_move};
use shared::{GlobalListeners, ListenerGuard, Scheduler, TaskId};
use tracing::{debug, trace};

pub type ResizeStartFn = Rc<dyn Fn(Option<Orientation>)>;
pub type ResizeFn = Rc<dyn Fn(Rect)>;
pub type ResizeEndFn = Rc<dyn Fn()>;

/// Optional host notifications. A missing callback is skipped silently.
///
/// Callbacks run while the controller is borrowed, so they must not call back
/// into it synchronously.
#[derive(Clone, Default)]
pub struct CropCallbacks {
    pub on_resize_start: Option<ResizeStartFn>,
    pub on_resize: Option<ResizeFn>,
    pub on_resize_end: Option<ResizeEndFn>,
}

impl CropCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_on_resize_start(mut self, f: impl Fn(Option<Orientation>) + 'static) -> Self {
        self.on_resize_start = Some(Rc::new(f));
        self
    }

    pub fn with_on_resize(mut self, f: impl Fn(Rect) + 'static) -> Self {
        self.on_resize = Some(Rc::new(f));
        self
    }

    pub fn with_on_resize_end(mut self, f: impl Fn() + 'static) -> Self {
        self.on_resize_end = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for CropCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropCallbacks")
            .field("on_resize_start", &self.on_resize_start.is_some())
            .field("on_resize", &self.on_resize.is_some())
            .field("on_resize_end", &self.on_resize_end.is_some())
            .finish()
    }
}

/// Values the host owns and passes down on every render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropProps {
    pub rect: Rect,
    /// Logical units per screen pixel of pointer travel.
    pub speed: f32,
    pub viewport_offset: Vec2,
}

impl CropProps {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            speed: 1.0,
            viewport_offset: Vec2::ZERO,
        }
    }

    pub fn from_config(rect: Rect, config: &CropConfig) -> Self {
        Self {
            rect,
            speed: config.speed,
            viewport_offset: config.viewport_offset,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_viewport_offset(mut self, offset: Vec2) -> Self {
        self.viewport_offset = offset;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

/// Whether the host should stop the native event here (prevent its default
/// action and further propagation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Ignored,
    Captured,
}

impl EventStatus {
    pub fn is_captured(self) -> bool {
        matches!(self, EventStatus::Captured)
    }
}

/// State of one drag, from press to release.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub orientation: Option<Orientation>,
    /// Rectangle deltas are applied to.
    pub origin_rect: Rect,
    pub last_rect: Rect,
    /// Pointer position deltas are measured from.
    pub start_pointer: Vec2,
    pub last_pointer: Vec2,
    pub speed: f32,
    pub viewport_offset: Vec2,
    rebaselined: bool,
}

impl DragSession {
    fn new(props: &CropProps, orientation: Option<Orientation>, pointer: Vec2) -> Self {
        Self {
            orientation,
            origin_rect: props.rect,
            last_rect: props.rect,
            start_pointer: pointer,
            last_pointer: pointer,
            speed: props.speed,
            viewport_offset: props.viewport_offset,
            rebaselined: false,
        }
    }

    fn rebaseline(&mut self, rect: Rect) {
        self.origin_rect = rect;
        self.last_rect = rect;
        self.start_pointer = self.last_pointer;
        self.rebaselined = true;
    }
}

#[derive(Debug)]
struct ActiveDrag {
    session: DragSession,
    // Dropping the drag detaches the global listeners.
    _listeners: ListenerGuard,
}

pub struct DragController {
    props: CropProps,
    callbacks: CropCallbacks,
    listeners: Rc<dyn GlobalListeners>,
    scheduler: Rc<dyn Scheduler>,
    delivery: ReconcileDelivery,
    active: Option<ActiveDrag>,
    pending_reconcile: Option<TaskId>,
}

impl DragController {
    pub fn new(
        props: CropProps,
        listeners: Rc<dyn GlobalListeners>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            props,
            callbacks: CropCallbacks::default(),
            listeners,
            scheduler,
            delivery: ReconcileDelivery::default(),
            active: None,
            pending_reconcile: None,
        }
    }

    pub fn from_config(
        rect: Rect,
        config: &CropConfig,
        listeners: Rc<dyn GlobalListeners>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self::new(CropProps::from_config(rect, config), listeners, scheduler)
            .with_reconcile_delivery(config.reconcile_delivery)
    }

    pub fn with_callbacks(mut self, callbacks: CropCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_reconcile_delivery(mut self, delivery: ReconcileDelivery) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn set_callbacks(&mut self, callbacks: CropCallbacks) {
        self.callbacks = callbacks;
    }

    pub fn props(&self) -> &CropProps {
        &self.props
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.active.as_ref().map(|active| &active.session)
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.session().and_then(|session| session.orientation)
    }

    /// Starts a drag. `orientation` is the tag of the pressed handle, or
    /// `None` when the press landed on the body.
    pub fn on_press_start(
        &mut self,
        pointer: Vec2,
        button: PointerButton,
        orientation: Option<Orientation>,
    ) -> EventStatus {
        if button != PointerButton::Primary {
            trace!("ignoring {button:?} press");
            return EventStatus::Ignored;
        }

        if self.active.is_some() {
            debug!("press while a drag is active, ignoring");
            return EventStatus::Ignored;
        }

        self.active = Some(ActiveDrag {
            session: DragSession::new(&self.props, orientation, pointer),
            _listeners: ListenerGuard::acquire(self.listeners.clone()),
        });

        debug!(?orientation, ?pointer, "crop drag started");

        if let Some(on_resize_start) = &self.callbacks.on_resize_start {
            on_resize_start(orientation);
        }

        EventStatus::Captured
    }

    /// Applies the pointer travel since the press (or the last re-baseline)
    /// and reports the new rectangle.
    ///
    /// Right after a re-baseline the first move that lands on the current
    /// rectangle is not reported again; every other move is.
    pub fn on_pointer_move(&mut self, pointer: Vec2) -> EventStatus {
        let Some(active) = self.active.as_mut() else {
            return EventStatus::Ignored;
        };

        let session = &mut active.session;
        session.last_pointer = pointer;

        let delta = (pointer - session.start_pointer) * session.speed;
        let next = resize_or_move(session.origin_rect, session.orientation, delta).normalize();

        if session.rebaselined && next == session.last_rect {
            trace!("pointer move left the re-baselined crop unchanged");
            return EventStatus::Captured;
        }

        session.rebaselined = false;
        session.last_rect = next;
        trace!(?next, "crop resized");

        // A pan result still waiting for the idle turn is older than this one.
        self.cancel_pending_reconcile();

        if let Some(on_resize) = &self.callbacks.on_resize {
            on_resize(next);
        }

        EventStatus::Captured
    }

    pub fn on_press_end(&mut self, pointer: Vec2) -> EventStatus {
        let Some(active) = self.active.take() else {
            return EventStatus::Ignored;
        };

        self.cancel_pending_reconcile();
        debug!(?pointer, rect = ?active.session.last_rect, "crop drag ended");
        drop(active);

        if let Some(on_resize_end) = &self.callbacks.on_resize_end {
            on_resize_end();
        }

        EventStatus::Captured
    }

    /// Takes new host props. While dragging, a speed change re-baselines the
    /// session and a viewport offset change shifts the rectangle to keep it
    /// under the pointer.
    pub fn on_props_change(&mut self, next: CropProps) {
        self.props = next;

        let Some(active) = self.active.as_mut() else {
            return;
        };

        let session = &mut active.session;

        if next.speed != session.speed {
            debug!(from = session.speed, to = next.speed, "drag speed changed");
            let last = session.last_rect;
            session.rebaseline(last);
            session.speed = next.speed;
        }

        if next.viewport_offset == session.viewport_offset {
            return;
        }

        let delta = (session.viewport_offset - next.viewport_offset) * session.speed;
        let rect = resize_or_move(session.last_rect, session.orientation, delta).normalize();
        session.rebaseline(rect);
        session.viewport_offset = next.viewport_offset;

        debug!(?delta, ?rect, "viewport moved during drag");
        self.deliver_reconciled(rect);
    }

    /// Releases everything a live drag holds. Safe to call at any time.
    pub fn teardown(&mut self) {
        self.cancel_pending_reconcile();

        if let Some(active) = self.active.take() {
            debug!(rect = ?active.session.last_rect, "crop torn down mid-drag");
        }
    }

    fn deliver_reconciled(&mut self, rect: Rect) {
        self.cancel_pending_reconcile();

        let Some(on_resize) = self.callbacks.on_resize.clone() else {
            return;
        };

        match self.delivery {
            ReconcileDelivery::Immediate => on_resize(rect),
            ReconcileDelivery::Deferred => {
                let id = self.scheduler.schedule(Box::new(move || on_resize(rect)));
                self.pending_reconcile = Some(id);
            }
        }
    }

    fn cancel_pending_reconcile(&mut self) {
        if let Some(id) = self.pending_reconcile.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl Drop for DragController {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for DragController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragController")
            .field("props", &self.props)
            .field("callbacks", &self.callbacks)
            .field("delivery", &self.delivery)
            .field("session", &self.session())
            .field("pending_reconcile", &self.pending_reconcile)
            .finish()
    }
}
