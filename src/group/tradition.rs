//! Recurring tradition cadence

use crate::core::calendar::days_between;
use crate::core::types::{MemberId, QuestId};
use crate::group::profile::Tradition;
use crate::quest::{Participants, Quest, QuestKind};
use crate::rewards::RewardTemplate;
use crate::templates::QuestTemplate;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

pub const TRADITION_CATEGORY: &str = "tradition";
const TRADITION_DIFFICULTY: u8 = 2;

/// Days since the tradition was last celebrated, None if never
pub fn days_since_celebrated(tradition: &Tradition, now: &DateTime<Utc>) -> Option<i64> {
    tradition.last_celebrated.map(|last| days_between(&last, now))
}

/// Whether enough days have passed for the tradition's cadence
pub fn is_due(tradition: &Tradition, now: &DateTime<Utc>) -> bool {
    match days_since_celebrated(tradition, now) {
        None => true,
        Some(days) => days >= tradition.cadence.min_days(),
    }
}

/// Quest celebrating `tradition` with every member required
pub fn tradition_quest<R: Rng + ?Sized>(
    tradition: &Tradition,
    members: &[MemberId],
    level: u32,
    rng: &mut R,
) -> Quest {
    let template = QuestTemplate {
        id: format!("tradition-{}", tradition.id),
        title_pattern: "Celebrate {tradition}".into(),
        description_pattern: "Time for {tradition} again. Everyone joins in.".into(),
        category: TRADITION_CATEGORY.into(),
        difficulty: TRADITION_DIFFICULTY,
        time_estimate_minutes: 60,
        energy_level: 0.5,
        focus_required: 2,
        skills: BTreeSet::new(),
        variables: BTreeMap::from([("tradition".to_string(), tradition.name.clone())]),
    };

    Quest::from_template(
        QuestId::generate(rng),
        &template,
        QuestKind::Tradition,
        RewardTemplate::for_difficulty(TRADITION_DIFFICULTY),
        level,
    )
    .with_participants(Participants {
        required: members.to_vec(),
        optional: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::Cadence;
    use chrono::{Duration, TimeZone};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 31, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_never_celebrated_is_due() {
        for cadence in [Cadence::Daily, Cadence::Weekly, Cadence::Monthly, Cadence::Yearly] {
            assert!(is_due(&Tradition::new("t", "T", cadence), &now()));
        }
    }

    #[test]
    fn test_cadence_boundaries() {
        let cases = [
            (Cadence::Daily, 1),
            (Cadence::Weekly, 7),
            (Cadence::Monthly, 30),
            (Cadence::Yearly, 365),
        ];
        for (cadence, days) in cases {
            let just_due = Tradition::new("t", "T", cadence).celebrated_at(now() - Duration::days(days));
            assert!(is_due(&just_due, &now()), "{:?} at {} days", cadence, days);
            let too_soon =
                Tradition::new("t", "T", cadence).celebrated_at(now() - Duration::days(days - 1));
            assert!(!is_due(&too_soon, &now()), "{:?} at {} days", cadence, days - 1);
        }
    }

    #[test]
    fn test_tradition_quest_includes_everyone() {
        let members: Vec<MemberId> = ["a", "b", "c"].iter().map(|m| MemberId::from(*m)).collect();
        let tradition = Tradition::new("pizza", "Friday pizza night", Cadence::Weekly);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let quest = tradition_quest(&tradition, &members, 1, &mut rng);

        assert_eq!(quest.title, "Celebrate Friday pizza night");
        assert_eq!(quest.kind, QuestKind::Tradition);
        assert_eq!(quest.participants.unwrap().required.len(), 3);
    }
}
