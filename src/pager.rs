use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Horizontal distance a page slides in from, in pixels.
pub const SLIDE_DISTANCE_PX: i32 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerPage {
    pub heading: String,
    pub bullets: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PagerError {
    #[error("a pager needs at least one page")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Forward,
    Backward,
    #[default]
    None,
}

impl Direction {
    fn from_delta(delta: isize) -> Self {
        match delta.signum() {
            1 => Self::Forward,
            -1 => Self::Backward,
            _ => Self::None,
        }
    }
}

/// Index into a fixed, non-empty list of pages. Navigation clamps at both
/// ends; there is no wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    len: usize,
    index: usize,
    direction: Direction,
}

impl Pager {
    /// Fails with [`PagerError::Empty`] for `len == 0`. Callers are expected
    /// to hand over static, non-empty content; the error exists so that
    /// mistake surfaces in tests rather than as a silent blank card.
    pub fn new(len: usize) -> Result<Self, PagerError> {
        if len == 0 {
            return Err(PagerError::Empty);
        }
        Ok(Self {
            len,
            index: 0,
            direction: Direction::None,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn can_previous(&self) -> bool {
        self.index > 0
    }

    pub fn can_next(&self) -> bool {
        self.index + 1 < self.len
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.index + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.index.checked_sub(1) {
            Some(i) => self.go_to(i),
            None => false,
        }
    }

    /// Jumps to `index`. Out-of-range and same-page requests are ignored.
    /// Returns whether the page changed.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len || index == self.index {
            return false;
        }
        self.direction = Direction::from_delta(index as isize - self.index as isize);
        self.index = index;
        true
    }

    pub fn handle_key(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" => self.previous(),
            "ArrowRight" => self.next(),
            _ => false,
        }
    }

    /// Where the incoming page starts, in pixels. Reduced motion degrades
    /// the slide to a plain fade.
    pub fn enter_offset(&self, reduced_motion: bool) -> i32 {
        if reduced_motion {
            return 0;
        }
        match self.direction {
            Direction::Forward => SLIDE_DISTANCE_PX,
            Direction::Backward => -SLIDE_DISTANCE_PX,
            Direction::None => 0,
        }
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.index + 1, self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(Pager::new(0), Err(PagerError::Empty));
    }

    #[test]
    fn test_previous_at_start_is_noop() {
        let mut pager = Pager::new(5).unwrap();
        assert!(!pager.previous());
        assert_eq!(pager.index(), 0);
        assert!(!pager.can_previous());
        assert!(pager.can_next());
    }

    #[test]
    fn test_next_clamps_at_end() {
        let mut pager = Pager::new(3).unwrap();
        for _ in 0..10 {
            pager.next();
        }
        assert_eq!(pager.index(), 2);
        assert!(!pager.can_next());
        assert!(!pager.next());
        assert_eq!(pager.label(), "Page 3 of 3");
    }

    #[test]
    fn test_index_stays_in_bounds_for_mixed_input() {
        let mut pager = Pager::new(4).unwrap();
        let mut seed = 0x2545_f491_u32;
        for _ in 0..500 {
            // xorshift to get a reproducible mix of inputs
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            match seed % 5 {
                0 => {
                    pager.next();
                }
                1 => {
                    pager.previous();
                }
                2 => {
                    pager.go_to((seed % 9) as usize);
                }
                3 => {
                    pager.handle_key("ArrowLeft");
                }
                _ => {
                    pager.handle_key("ArrowRight");
                }
            }
            assert!(pager.index() < pager.len());
        }
    }

    #[test]
    fn test_go_to_ignores_out_of_range() {
        let mut pager = Pager::new(5).unwrap();
        assert!(pager.go_to(3));
        assert!(!pager.go_to(5));
        assert!(!pager.go_to(usize::MAX));
        assert_eq!(pager.index(), 3);
    }

    #[test]
    fn test_direction_follows_delta_sign() {
        let mut pager = Pager::new(5).unwrap();
        assert_eq!(pager.direction(), Direction::None);
        pager.go_to(4);
        assert_eq!(pager.direction(), Direction::Forward);
        assert_eq!(pager.enter_offset(false), 24);
        pager.go_to(1);
        assert_eq!(pager.direction(), Direction::Backward);
        assert_eq!(pager.enter_offset(false), -24);
        assert_eq!(pager.enter_offset(true), 0);
    }

    #[test]
    fn test_arrow_keys() {
        let mut pager = Pager::new(2).unwrap();
        assert!(pager.handle_key("ArrowRight"));
        assert_eq!(pager.index(), 1);
        assert!(!pager.handle_key("Enter"));
        assert!(pager.handle_key("ArrowLeft"));
        assert_eq!(pager.index(), 0);
    }

    #[test]
    fn test_single_page() {
        let mut pager = Pager::new(1).unwrap();
        assert!(!pager.can_next());
        assert!(!pager.can_previous());
        assert!(!pager.next());
        assert_eq!(pager.index(), 0);
    }
}
