use config::Placement;
use hint_labels::Label;

use crate::{
    deps::{LabelBox, Target},
    geom::{Display, label_origin},
};

/// Outcome of typing one letter into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Typed {
    /// The buffer now equals a label; the session is finished.
    Matched(Target),
    /// The buffer grew and may still become a label.
    Pending,
    /// The buffer outgrew every label and was cleared.
    Reset,
}

/// Targets and labels of one open hint session, plus the letters typed so far.
///
/// `targets[i]` is selected by `labels[i]`.
#[derive(Debug, Clone)]
pub struct Session {
    /// Labeled targets.
    targets: Vec<Target>,
    /// Labels, index-aligned with `targets`.
    labels: Vec<Label>,
    /// Letters typed so far, uppercase.
    typed: String,
    /// Longest label length.
    max_len: usize,
}

impl Session {
    /// Pair targets with labels. Whichever list is longer is cut to the
    /// length of the other.
    pub fn new(mut targets: Vec<Target>, mut labels: Vec<Label>) -> Self {
        let n = targets.len().min(labels.len());
        targets.truncate(n);
        labels.truncate(n);
        let max_len = labels.iter().map(Label::len).max().unwrap_or(0);
        Self {
            targets,
            labels,
            typed: String::new(),
            max_len,
        }
    }

    /// Number of labeled targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when nothing is labeled.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Letters typed so far.
    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Append a letter and look for an exact, case-insensitive label match.
    pub fn push(&mut self, letter: char) -> Typed {
        self.typed.push(letter.to_ascii_uppercase());
        let hit = self
            .labels
            .iter()
            .position(|l| l.matches_ignore_case(&self.typed));
        if let Some(i) = hit {
            self.typed.clear();
            return Typed::Matched(self.targets[i].clone());
        }
        if self.typed.len() > self.max_len {
            self.typed.clear();
            return Typed::Reset;
        }
        Typed::Pending
    }

    /// Label boxes for the renderer, in label order.
    pub fn boxes(&self, placement: &Placement, display: &Display) -> Vec<LabelBox> {
        self.labels
            .iter()
            .zip(&self.targets)
            .map(|(label, target)| LabelBox {
                label: label.clone(),
                target: target.clone(),
                origin: label_origin(placement, &target.rect, display),
                color: target.category.color(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        deps::ElementHandle,
        geom::{Category, Rect},
    };

    fn targets(n: usize) -> Vec<Target> {
        (0..n)
            .map(|i| Target {
                handle: ElementHandle(i as u64),
                rect: Rect::new(0, 20 * i as i32, 50, 20 * i as i32 + 15),
                category: Category::Button,
            })
            .collect()
    }

    fn session(n: usize) -> Session {
        Session::new(targets(n), hint_labels::generate(n))
    }

    #[test]
    fn single_letter_match() {
        let mut s = session(3);
        match s.push('m') {
            Typed::Matched(t) => assert_eq!(t.handle, ElementHandle(1)),
            other => panic!("expected match, got {:?}", other),
        }
        assert_eq!(s.typed(), "");
    }

    #[test]
    fn two_letter_match_after_pending() {
        let mut s = session(10);
        assert_eq!(s.push('a'), Typed::Pending);
        assert_eq!(s.typed(), "A");
        // 9th label is AA, 10th is AS
        assert_eq!(s.push('s'), Typed::Matched(targets(10)[9].clone()));
    }

    #[test]
    fn overlong_buffer_resets() {
        let mut s = session(10);
        assert_eq!(s.push('Z'), Typed::Pending);
        assert_eq!(s.push('Z'), Typed::Pending);
        assert_eq!(s.push('Z'), Typed::Reset);
        assert_eq!(s.typed(), "");
    }

    #[test]
    fn boxes_follow_labels() {
        let s = session(2);
        let b = s.boxes(&Placement::default(), &Display::default());
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].label.as_str(), "E");
        assert_eq!(b[1].label.as_str(), "M");
        assert_eq!(b[1].origin.y, 20 - 6);
    }

    #[test]
    fn unlabeled_targets_are_dropped() {
        let s = Session::new(targets(5), hint_labels::generate(3));
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn surplus_labels_are_dropped() {
        let mut s = Session::new(targets(2), hint_labels::generate(5));
        assert_eq!(s.len(), 2);
        assert_eq!(s.boxes(&Placement::default(), &Display::default()).len(), 2);
        // H labels the fifth target, which does not exist here
        assert_eq!(s.push('h'), Typed::Pending);
        assert_eq!(s.push('h'), Typed::Reset);
        assert_eq!(s.push('m'), Typed::Matched(targets(2)[1].clone()));
    }
}
