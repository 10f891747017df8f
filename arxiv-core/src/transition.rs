//! Scroll-driven hand-off between the hero panel and the paper feed.
//!
//! Both panels cover the same viewport rectangle. A single scroll progress
//! value drives every visual channel; all channels reach their end values at
//! progress 0.5 and hold them past that point.

/// Progress at which the hand-off completes.
pub const HANDOFF_END: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStyle {
    /// Vertical offset as a fraction of the viewport height; -1.0 is one
    /// full viewport up.
    pub translate_y: f32,
    pub opacity: f32,
    pub scale: f32,
    /// Tilt around the horizontal axis, in degrees.
    pub rotate_deg: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub progress: f32,
    pub hero: PanelStyle,
    pub feed: PanelStyle,
}

/// One channel: value at progress 0 and at `HANDOFF_END`.
#[derive(Debug, Clone, Copy)]
struct Channel {
    from: f32,
    to: f32,
}

impl Channel {
    const fn new(from: f32, to: f32) -> Self {
        Self { from, to }
    }

    fn at(self, t: f32) -> f32 {
        self.from + (self.to - self.from) * t
    }
}

const HERO_Y: Channel = Channel::new(0.0, -1.0);
const HERO_OPACITY: Channel = Channel::new(1.0, 0.0);
const HERO_SCALE: Channel = Channel::new(1.0, 0.8);
const HERO_ROTATE: Channel = Channel::new(0.0, 20.0);

const FEED_Y: Channel = Channel::new(1.0, 0.0);
const FEED_OPACITY: Channel = Channel::new(0.0, 1.0);
const FEED_SCALE: Channel = Channel::new(0.8, 1.0);

impl Transition {
    pub fn at(progress: f32) -> Self {
        let progress = if progress.is_nan() { 0.0 } else { progress };
        let t = (progress / HANDOFF_END).clamp(0.0, 1.0);
        Self {
            progress,
            hero: PanelStyle {
                translate_y: HERO_Y.at(t),
                opacity: HERO_OPACITY.at(t),
                scale: HERO_SCALE.at(t),
                rotate_deg: HERO_ROTATE.at(t),
            },
            feed: PanelStyle {
                translate_y: FEED_Y.at(t),
                opacity: FEED_OPACITY.at(t),
                scale: FEED_SCALE.at(t),
                rotate_deg: 0.0,
            },
        }
    }

    /// Whether the hero is the panel the user mostly sees, and so the one
    /// that should receive input.
    pub fn hero_interactive(&self) -> bool {
        self.hero.opacity > 0.5
    }
}

/// Progress of a scroll container whose range runs from its top touching the
/// viewport top (0) to its bottom touching the viewport top (1).
pub fn scroll_progress(offset: f32, container_height: f32) -> f32 {
    if container_height <= 0.0 || offset.is_nan() {
        return 0.0;
    }
    (offset / container_height).clamp(0.0, 1.0)
}

/// Virtual scroll position of the landing container, which is twice the
/// viewport height so that scrolling to its end completes the hand-off.
///
/// Once the feed has settled the wheel belongs to the paper list, except
/// upward scrolling while the list sits at its top (or no list is shown),
/// which rolls the hand-off back towards the hero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LandingScroll {
    offset: f32,
    list_owns_scroll: bool,
}

impl LandingScroll {
    /// Applies one frame of wheel input. `delta` follows egui's sign
    /// convention: positive means the content moves down (scrolling up).
    pub fn apply(&mut self, delta: f32, viewport_height: f32, list_at_top: bool) -> Transition {
        let container_height = viewport_height * 2.0;
        let max_offset = (container_height - viewport_height).max(0.0);

        let feed_settled = self.offset >= max_offset;
        self.list_owns_scroll = feed_settled && !(delta > 0.0 && list_at_top);
        if !self.list_owns_scroll && !delta.is_nan() {
            self.offset -= delta;
        }
        self.offset = self.offset.clamp(0.0, max_offset);

        Transition::at(scroll_progress(self.offset, container_height))
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Whether the paper list should consume wheel input this frame.
    pub fn list_owns_scroll(&self) -> bool {
        self.list_owns_scroll
    }
}
