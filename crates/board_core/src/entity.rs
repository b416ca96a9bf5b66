use std::time::{Duration, Instant};

use thiserror::Error;

use crate::tween::{CountTween, Easing, DEFAULT_ANIMATION};
use crate::{MergedPageRecord, Trend, ViewId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Pending,
    Visible,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("page record has an empty path")]
    EmptyPath,
    #[error("page {path} has no usable thumbnail")]
    MissingThumbnail { path: String },
    #[error("entity for {path} was already removed")]
    AlreadyRemoved { path: String },
}

/// A count change accepted by an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountChange {
    pub from: u64,
    pub to: u64,
    pub trend: Trend,
}

/// Live state of one visible page row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntity {
    path: String,
    view: ViewId,
    title: String,
    thumbnail_url: String,
    embed_html: Option<String>,
    visitor_count: u64,
    displayed: u64,
    trend: Option<Trend>,
    animation: Option<CountTween>,
    animation_duration: Duration,
    easing: Easing,
    lifecycle: Lifecycle,
}

impl DisplayEntity {
    /// Builds a pending entity; call [`DisplayEntity::show`] once it is inserted.
    pub fn create(record: &MergedPageRecord, view: ViewId) -> Result<Self, EntityError> {
        if record.path.trim().is_empty() {
            return Err(EntityError::EmptyPath);
        }
        if record.thumbnail_url.trim().is_empty() {
            return Err(EntityError::MissingThumbnail {
                path: record.path.clone(),
            });
        }
        Ok(Self {
            path: record.path.clone(),
            view,
            title: record.title.clone(),
            thumbnail_url: record.thumbnail_url.clone(),
            embed_html: record.embed_html.clone(),
            visitor_count: record.visitor_count,
            displayed: record.visitor_count,
            trend: None,
            animation: None,
            animation_duration: DEFAULT_ANIMATION,
            easing: Easing::Linear,
            lifecycle: Lifecycle::Pending,
        })
    }

    pub fn with_animation(mut self, duration: Duration, easing: Easing) -> Self {
        self.animation_duration = duration;
        self.easing = easing;
        self
    }

    pub fn show(&mut self) {
        if self.lifecycle == Lifecycle::Pending {
            self.lifecycle = Lifecycle::Visible;
        }
    }

    /// Retargets the count. Any running animation is replaced by one that
    /// starts from the value currently on screen.
    pub fn set_visitors(
        &mut self,
        count: u64,
        now: Instant,
    ) -> Result<Option<CountChange>, EntityError> {
        if self.lifecycle == Lifecycle::Removed {
            return Err(EntityError::AlreadyRemoved {
                path: self.path.clone(),
            });
        }
        let Some(trend) = Trend::between(self.visitor_count, count) else {
            return Ok(None);
        };

        let from = self.visitor_count;
        let shown = self.displayed_at(now);
        self.animation = Some(
            CountTween::new(shown, count, now, self.animation_duration).with_easing(self.easing),
        );
        self.visitor_count = count;
        self.trend = Some(trend);

        Ok(Some(CountChange {
            from,
            to: count,
            trend,
        }))
    }

    /// Advances the animation. Returns the new displayed value when it changed.
    pub fn frame(&mut self, now: Instant) -> Option<u64> {
        let tween = self.animation.as_ref()?;
        let value = tween.value_at(now);
        if tween.is_finished(now) {
            self.animation = None;
        }
        if value == self.displayed {
            return None;
        }
        self.displayed = value;
        Some(value)
    }

    /// Cancels any animation and marks the entity removed. Returns `false` if
    /// it was already removed.
    pub fn remove(&mut self) -> bool {
        if self.lifecycle == Lifecycle::Removed {
            return false;
        }
        self.animation = None;
        self.lifecycle = Lifecycle::Removed;
        true
    }

    fn displayed_at(&self, now: Instant) -> u64 {
        self.animation
            .as_ref()
            .map_or(self.displayed, |tween| tween.value_at(now))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }

    pub fn embed_html(&self) -> Option<&str> {
        self.embed_html.as_deref()
    }

    /// Latest target count; the value layout sorts by.
    pub fn visitor_count(&self) -> u64 {
        self.visitor_count
    }

    pub fn displayed_count(&self) -> u64 {
        self.displayed
    }

    pub fn trend(&self) -> Option<Trend> {
        self.trend
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, count: u64) -> MergedPageRecord {
        MergedPageRecord {
            path: path.to_string(),
            visitor_count: count,
            title: "Title".to_string(),
            thumbnail_url: "http://img/1.jpg".to_string(),
            embed_html: None,
        }
    }

    fn visible(count: u64) -> DisplayEntity {
        let mut entity = DisplayEntity::create(&record("/a.html", count), ViewId(1)).unwrap();
        entity.show();
        entity
    }

    #[test]
    fn create_rejects_blank_thumbnail() {
        let mut bad = record("/a.html", 1);
        bad.thumbnail_url = " ".to_string();
        assert_eq!(
            DisplayEntity::create(&bad, ViewId(0)),
            Err(EntityError::MissingThumbnail {
                path: "/a.html".to_string()
            })
        );
    }

    #[test]
    fn unchanged_count_is_not_a_change() {
        let mut entity = visible(50);
        assert_eq!(entity.set_visitors(50, Instant::now()), Ok(None));
        assert!(!entity.is_animating());
    }

    #[test]
    fn animation_converges_to_exact_target() {
        let start = Instant::now();
        let mut entity = visible(10);
        let change = entity.set_visitors(37, start).unwrap().unwrap();
        assert_eq!(change.trend, Trend::Up);

        let mut shown = vec![entity.displayed_count()];
        for step in 1..=30 {
            if let Some(value) = entity.frame(start + Duration::from_millis(step * 40)) {
                shown.push(value);
            }
        }

        assert!(shown.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(entity.displayed_count(), 37);
        assert!(!entity.is_animating());
    }

    #[test]
    fn new_target_supersedes_running_animation() {
        let start = Instant::now();
        let mut entity = visible(100);
        entity.set_visitors(200, start).unwrap();
        let halfway = start + Duration::from_millis(500);
        assert_eq!(entity.frame(halfway), Some(150));

        let change = entity.set_visitors(120, halfway).unwrap().unwrap();
        assert_eq!(change.from, 200);
        assert_eq!(change.trend, Trend::Down);

        // Restarts from the value on screen, not from the old target.
        let just_after = halfway + Duration::from_millis(1);
        assert!(entity.frame(just_after).map_or(true, |value| value <= 150));
        entity.frame(halfway + DEFAULT_ANIMATION);
        assert_eq!(entity.displayed_count(), 120);
    }

    #[test]
    fn remove_cancels_animation_once() {
        let start = Instant::now();
        let mut entity = visible(1);
        entity.set_visitors(9, start).unwrap();
        assert!(entity.remove());
        assert!(!entity.is_animating());
        assert_eq!(entity.lifecycle(), Lifecycle::Removed);
        assert!(!entity.remove());
        assert!(entity.set_visitors(3, start).is_err());
    }
}
