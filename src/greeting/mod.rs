use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;

mod error;
pub mod prompt;
pub mod service;

pub use error::GreetingError;
pub use service::{Greeting, GreetingService};

/// Time-of-day bucket used to pick the salutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GreetingCategory {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl GreetingCategory {
    pub const ALL: [GreetingCategory; 4] = [
        GreetingCategory::Morning,
        GreetingCategory::Afternoon,
        GreetingCategory::Evening,
        GreetingCategory::Night,
    ];

    pub fn salutation(&self) -> &'static str {
        match self {
            GreetingCategory::Morning => "Good morning",
            GreetingCategory::Afternoon => "Good afternoon",
            GreetingCategory::Evening => "Good evening",
            GreetingCategory::Night => "Good night",
        }
    }
}

impl fmt::Display for GreetingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GreetingCategory::Morning => write!(f, "Morning"),
            GreetingCategory::Afternoon => write!(f, "Afternoon"),
            GreetingCategory::Evening => write!(f, "Evening"),
            GreetingCategory::Night => write!(f, "Night"),
        }
    }
}

/// Hours at which each later category starts. Intervals are left-inclusive:
/// `[0, afternoon_start)` is morning and `[night_start, 24)` is night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DayBoundaries {
    pub afternoon_start: u32,
    pub evening_start: u32,
    pub night_start: u32,
}

impl Default for DayBoundaries {
    fn default() -> Self {
        Self {
            afternoon_start: 12,
            evening_start: 18,
            night_start: 20,
        }
    }
}

impl DayBoundaries {
    /// Every category must own at least one hour of the day.
    pub fn is_valid(&self) -> bool {
        0 < self.afternoon_start
            && self.afternoon_start < self.evening_start
            && self.evening_start < self.night_start
            && self.night_start <= 24
    }

    pub fn classify(&self, hour: u32) -> GreetingCategory {
        if hour < self.afternoon_start {
            GreetingCategory::Morning
        } else if hour < self.evening_start {
            GreetingCategory::Afternoon
        } else if hour < self.night_start {
            GreetingCategory::Evening
        } else {
            GreetingCategory::Night
        }
    }
}

/// Classify an hour with the default 12/18/20 boundaries.
pub fn classify(hour: u32) -> GreetingCategory {
    DayBoundaries::default().classify(hour)
}

/// An hour of the local day, in `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    hour: u32,
}

impl ClockReading {
    pub fn new(hour: u32) -> Option<Self> {
        (hour < 24).then_some(Self { hour })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> ClockReading;
}

/// Reads the system clock in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> ClockReading {
        ClockReading {
            hour: chrono::Local::now().hour(),
        }
    }
}

/// Always reports the same hour.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(ClockReading);

impl FixedClock {
    pub fn new(reading: ClockReading) -> Self {
        Self(reading)
    }

    pub fn at_hour(hour: u32) -> Option<Self> {
        ClockReading::new(hour).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> ClockReading {
        self.0
    }
}

/// The two languages the reply should blend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Languages {
    pub primary: String,
    pub secondary: String,
}

impl Default for Languages {
    fn default() -> Self {
        Self {
            primary: "Urdu".to_string(),
            secondary: "English".to_string(),
        }
    }
}

impl Languages {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

/// A validated name paired with the category it should be greeted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingRequest {
    name: String,
    category: GreetingCategory,
}

impl GreetingRequest {
    pub fn new(name: &str, category: GreetingCategory) -> Result<Self, GreetingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GreetingError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            category,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> GreetingCategory {
        self.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_boundary_hours() {
        assert_eq!(classify(0), GreetingCategory::Morning);
        assert_eq!(classify(11), GreetingCategory::Morning);
        assert_eq!(classify(12), GreetingCategory::Afternoon);
        assert_eq!(classify(17), GreetingCategory::Afternoon);
        assert_eq!(classify(18), GreetingCategory::Evening);
        assert_eq!(classify(19), GreetingCategory::Evening);
        assert_eq!(classify(20), GreetingCategory::Night);
        assert_eq!(classify(23), GreetingCategory::Night);
    }

    #[test]
    fn classify_covers_every_hour_in_order() {
        let expected = |hour: u32| match hour {
            0..=11 => GreetingCategory::Morning,
            12..=17 => GreetingCategory::Afternoon,
            18..=19 => GreetingCategory::Evening,
            _ => GreetingCategory::Night,
        };

        for hour in 0..24 {
            assert_eq!(classify(hour), expected(hour), "hour {}", hour);
        }
    }

    #[test]
    fn every_category_is_reachable() {
        let seen: Vec<GreetingCategory> = (0..24).map(classify).collect();
        for category in GreetingCategory::ALL {
            assert!(seen.contains(&category), "{} never produced", category);
        }
    }

    #[test]
    fn custom_boundaries_shift_categories() {
        let boundaries = DayBoundaries {
            afternoon_start: 11,
            evening_start: 17,
            night_start: 22,
        };

        assert_eq!(boundaries.classify(10), GreetingCategory::Morning);
        assert_eq!(boundaries.classify(11), GreetingCategory::Afternoon);
        assert_eq!(boundaries.classify(17), GreetingCategory::Evening);
        assert_eq!(boundaries.classify(21), GreetingCategory::Evening);
        assert_eq!(boundaries.classify(22), GreetingCategory::Night);
    }

    #[test]
    fn boundary_validation() {
        assert!(DayBoundaries::default().is_valid());
        assert!(
            !DayBoundaries {
                afternoon_start: 18,
                evening_start: 12,
                night_start: 20,
            }
            .is_valid()
        );
        assert!(
            !DayBoundaries {
                afternoon_start: 0,
                evening_start: 12,
                night_start: 20,
            }
            .is_valid()
        );
        assert!(
            !DayBoundaries {
                afternoon_start: 12,
                evening_start: 18,
                night_start: 25,
            }
            .is_valid()
        );
    }

    #[test]
    fn clock_reading_rejects_out_of_range_hours() {
        assert_eq!(ClockReading::new(23).map(|r| r.hour()), Some(23));
        assert!(ClockReading::new(24).is_none());
        assert!(FixedClock::at_hour(24).is_none());
    }

    #[test]
    fn local_clock_reads_a_valid_hour() {
        assert!(LocalClock.now().hour() < 24);
    }

    #[test]
    fn category_display_and_salutation() {
        assert_eq!(GreetingCategory::Morning.to_string(), "Morning");
        assert_eq!(GreetingCategory::Night.salutation(), "Good night");
    }

    #[test]
    fn request_trims_name_and_rejects_blank() {
        let request = GreetingRequest::new("  Ayesha ", GreetingCategory::Morning).unwrap();
        assert_eq!(request.name(), "Ayesha");
        assert_eq!(request.category(), GreetingCategory::Morning);

        assert!(matches!(
            GreetingRequest::new("   ", GreetingCategory::Night),
            Err(GreetingError::EmptyName)
        ));
    }
}
