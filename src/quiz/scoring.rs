use crate::quiz::models::{Badge, BadgeTier, QuizResults};

const EXCELLENT: Badge = Badge {
    text: "Excellent!",
    tier: BadgeTier::Top,
    color: "green",
    icon: "FaTrophy",
};

const GOOD_JOB: Badge = Badge {
    text: "Good Job!",
    tier: BadgeTier::High,
    color: "blue",
    icon: "FaStar",
};

const KEEP_TRYING: Badge = Badge {
    text: "Keep Trying!",
    tier: BadgeTier::Mid,
    color: "orange",
    icon: "FaRedo",
};

const PRACTICE_MORE: Badge = Badge {
    text: "Practice More!",
    tier: BadgeTier::Low,
    color: "red",
    icon: "FaRedo",
};

/// Zero when there is nothing to score against.
pub fn percentage(score: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    score as f64 / total as f64 * 100.0
}

/// Thresholds are inclusive lower bounds, checked from the top down.
pub fn badge(score: usize, total: usize) -> Badge {
    // Integer compare keeps 9/10 at exactly 90.
    let scaled = score * 100;
    match total {
        0 => PRACTICE_MORE,
        t if scaled >= 90 * t => EXCELLENT,
        t if scaled >= 70 * t => GOOD_JOB,
        t if scaled >= 50 * t => KEEP_TRYING,
        _ => PRACTICE_MORE,
    }
}

pub fn results(score: usize, total: usize) -> QuizResults {
    QuizResults {
        score,
        total,
        percentage: percentage(score, total),
        badge: badge(score, total),
    }
}
