//! Colour scale for shift labels.
//!
//! Shift labels look like `Dag - Fra 07:00 til 15:00`. They are ordered by
//! shift kind and start time, then spread over a fixed palette so adjacent
//! shifts get visibly different shades.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Default blue scale, lightest first.
pub const SHIFT_PALETTE: [&str; 5] = ["#abc9e1", "#9ecae1", "#4292c6", "#2171b5", "#084594"];

/// Day shifts first, then evening, then night, then anything else.
pub fn shift_priority(label: &str) -> u8 {
    if label.starts_with("Dag") {
        1
    } else if label.starts_with("Aften") {
        2
    } else if label.starts_with("Nat") {
        3
    } else {
        4
    }
}

/// Start of the shift in minutes after midnight, read from the first
/// `Fra HH:MM` in the label. Labels without one start at 0.
pub fn start_minutes(label: &str) -> u32 {
    label
        .match_indices("Fra ")
        .find_map(|(i, _)| parse_hh_mm(&label[i + 4..]))
        .unwrap_or(0)
}

fn parse_hh_mm(s: &str) -> Option<u32> {
    let b = s.as_bytes();
    if b.len() < 5 || b[2] != b':' {
        return None;
    }
    let digits = [b[0], b[1], b[3], b[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let [h1, h2, m1, m2] = digits.map(|d| (d - b'0') as u32);
    Some((h1 * 10 + h2) * 60 + m1 * 10 + m2)
}

/// Orders two shift labels by kind, then start time, then text.
pub fn compare_shifts(a: &str, b: &str) -> Ordering {
    shift_priority(a)
        .cmp(&shift_priority(b))
        .then_with(|| start_minutes(a).cmp(&start_minutes(b)))
        .then_with(|| a.cmp(b))
}

/// Sorted, de-duplicated shift labels.
pub fn sort_shift_labels<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let unique: BTreeSet<&str> = labels.iter().map(|l| l.as_ref()).collect();
    let mut sorted: Vec<String> = unique.into_iter().map(str::to_string).collect();
    sorted.sort_by(|a, b| compare_shifts(a, b));
    sorted
}

/// Assigns palette colours to shift labels.
///
/// The result depends only on the set of labels, never on their order.
/// With at most as many labels as colours the labels are spread evenly across
/// the palette; with more, the palette repeats.
pub fn create_color_map<S: AsRef<str>>(labels: &[S], palette: &[&str]) -> HashMap<String, String> {
    let sorted = sort_shift_labels(labels);
    let n = sorted.len();
    let p = palette.len();
    if p == 0 {
        return HashMap::new();
    }

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            let index = if n <= 1 {
                0
            } else if n <= p {
                ((i * (p - 1)) as f64 / (n - 1) as f64).round() as usize
            } else {
                i % p
            };
            (label, palette[index].to_string())
        })
        .collect()
}

/// Colour lookup for the shifts of the current view.
#[derive(Debug, Clone)]
pub struct ShiftColors {
    colors: HashMap<String, String>,
    fallback: Option<String>,
}

impl ShiftColors {
    pub fn new<S: AsRef<str>>(labels: &[S], palette: &[&str]) -> Self {
        Self {
            colors: create_color_map(labels, palette),
            fallback: palette.first().map(|c| c.to_string()),
        }
    }

    /// Colour of `label`. With one shift or none, every label gets the first
    /// palette colour.
    pub fn color_for(&self, label: &str) -> Option<&str> {
        if self.colors.len() <= 1 {
            return self.fallback.as_deref();
        }
        self.colors.get(label).map(String::as_str)
    }
}
