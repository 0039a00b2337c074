use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::FaithError;

#[derive(Debug)]
pub struct AzkarItem {
    pub id: &'static str,
    pub arabic: &'static str,
    pub transliteration: &'static str,
    pub translation: &'static str,
    pub max_count: u32,
}

#[derive(Debug)]
pub struct AzkarCategory {
    pub id: &'static str,
    pub title: &'static str,
    pub arabic: &'static str,
    pub icon: &'static str,
    pub items: &'static [AzkarItem],
}

impl AzkarCategory {
    pub fn item(&self, id: &str) -> Result<&'static AzkarItem, FaithError> {
        self.items
            .iter()
            .find(|i| i.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| FaithError::UnknownItem {
                category: self.id.to_string(),
                item: id.to_string(),
            })
    }
}

pub static CATALOGUE: &[AzkarCategory] = &[
    AzkarCategory {
        id: "morning",
        title: "Morning Azkar",
        arabic: "أذكار الصباح",
        icon: "🌅",
        items: &[
            AzkarItem {
                id: "m1",
                arabic: "أَصْبَحْنَا وَأَصْبَحَ الْمُلْكُ لِلَّهِ وَالْحَمْدُ لِلَّهِ",
                transliteration: "Asbahna wa asbahal mulku lillah walhamdu lillah",
                translation: "We have entered the morning and the entire kingdom belongs to Allah",
                max_count: 1,
            },
            AzkarItem {
                id: "m2",
                arabic: "سُبْحَانَ اللَّهِ وَبِحَمْدِهِ",
                transliteration: "SubhanAllahi wa bihamdihi",
                translation: "Glory be to Allah and His is the praise",
                max_count: 100,
            },
            AzkarItem {
                id: "m3",
                arabic: "لَا إِلَهَ إِلَّا اللَّهُ وَحْدَهُ لَا شَرِيكَ لَهُ",
                transliteration: "La ilaha illallah wahdahu la sharika lah",
                translation: "There is none worthy of worship but Allah alone, with no partner",
                max_count: 10,
            },
            AzkarItem {
                id: "m4",
                arabic: "اللَّهُمَّ بِكَ أَصْبَحْنَا وَبِكَ أَمْسَيْنَا",
                transliteration: "Allahumma bika asbahna wa bika amsayna",
                translation: "O Allah, by You we have entered the morning and by You we end the evening",
                max_count: 1,
            },
        ],
    },
    AzkarCategory {
        id: "evening",
        title: "Evening Azkar",
        arabic: "أذكار المساء",
        icon: "🌙",
        items: &[
            AzkarItem {
                id: "e1",
                arabic: "أَمْسَيْنَا وَأَمْسَى الْمُلْكُ لِلَّهِ وَالْحَمْدُ لِلَّهِ",
                transliteration: "Amsayna wa amsal mulku lillah walhamdu lillah",
                translation: "We have entered the evening and the entire kingdom belongs to Allah",
                max_count: 1,
            },
            AzkarItem {
                id: "e2",
                arabic: "اللَّهُمَّ بِكَ أَمْسَيْنَا وَبِكَ أَصْبَحْنَا",
                transliteration: "Allahumma bika amsayna wa bika asbahna",
                translation: "O Allah, by You we end the evening and by You we enter the morning",
                max_count: 1,
            },
            AzkarItem {
                id: "e3",
                arabic: "سُبْحَانَ اللَّهِ وَبِحَمْدِهِ",
                transliteration: "SubhanAllahi wa bihamdihi",
                translation: "Glory be to Allah and His is the praise",
                max_count: 100,
            },
        ],
    },
    AzkarCategory {
        id: "after_salah",
        title: "After Salah",
        arabic: "أذكار بعد الصلاة",
        icon: "🕌",
        items: &[
            AzkarItem {
                id: "s1",
                arabic: "سُبْحَانَ اللَّهِ",
                transliteration: "SubhanAllah",
                translation: "Glory be to Allah",
                max_count: 33,
            },
            AzkarItem {
                id: "s2",
                arabic: "الْحَمْدُ لِلَّهِ",
                transliteration: "Alhamdulillah",
                translation: "All praise is due to Allah",
                max_count: 33,
            },
            AzkarItem {
                id: "s3",
                arabic: "اللَّهُ أَكْبَرُ",
                transliteration: "Allahu Akbar",
                translation: "Allah is the Greatest",
                max_count: 33,
            },
            AzkarItem {
                id: "s4",
                arabic: "لَا إِلَهَ إِلَّا اللَّهُ وَحْدَهُ لَا شَرِيكَ لَهُ، لَهُ الْمُلْكُ وَلَهُ الْحَمْدُ وَهُوَ عَلَى كُلِّ شَيْءٍ قَدِيرٌ",
                transliteration: "La ilaha illallah wahdahu la sharika lah, lahul mulku wa lahul hamd, wa huwa 'ala kulli shay'in qadir",
                translation: "There is none worthy of worship but Allah alone, with no partner or associate",
                max_count: 1,
            },
        ],
    },
    AzkarCategory {
        id: "sleep",
        title: "Sleep Azkar",
        arabic: "أذكار النوم",
        icon: "😴",
        items: &[
            AzkarItem {
                id: "sl1",
                arabic: "بِاسْمِكَ اللَّهُمَّ أَمُوتُ وَأَحْيَا",
                transliteration: "Bismika Allahumma amutu wa ahya",
                translation: "In Your name O Allah, I die and I live",
                max_count: 1,
            },
            AzkarItem {
                id: "sl2",
                arabic: "سُبْحَانَ اللَّهِ",
                transliteration: "SubhanAllah",
                translation: "Glory be to Allah",
                max_count: 33,
            },
        ],
    },
    AzkarCategory {
        id: "general",
        title: "General Dua",
        arabic: "أدعية عامة",
        icon: "🤲",
        items: &[
            AzkarItem {
                id: "g1",
                arabic: "رَبَّنَا آتِنَا فِي الدُّنْيَا حَسَنَةً وَفِي الآخِرَةِ حَسَنَةً وَقِنَا عَذَابَ النَّارِ",
                transliteration: "Rabbana atina fid-dunya hasanatan wa fil-akhirati hasanatan wa qina azaban-nar",
                translation: "Our Lord, give us good in this world and good in the Hereafter and protect us from the punishment of the Fire",
                max_count: 3,
            },
            AzkarItem {
                id: "g2",
                arabic: "اللَّهُمَّ اغْفِرْ لِي وَتُبْ عَلَيَّ إِنَّكَ أَنْتَ التَّوَّابُ الرَّحِيمُ",
                transliteration: "Allahummaghfir li wa tub 'alayya innaka antat-tawwabur-rahim",
                translation: "O Allah, forgive me and accept my repentance, You are the Most-Forgiving, the Most-Merciful",
                max_count: 100,
            },
        ],
    },
];

pub fn category(id: &str) -> Result<&'static AzkarCategory, FaithError> {
    CATALOGUE
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| FaithError::UnknownCategory(id.to_string()))
}

/// One user's Azkar counters for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzkarDay {
    pub date: Option<NaiveDate>,
    /// category -> item -> count
    #[serde(default)]
    pub counts: BTreeMap<String, BTreeMap<String, u32>>,
    #[serde(default)]
    pub completed: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapOutcome {
    pub count: u32,
    pub max_count: u32,
    /// The category became complete on this tap and was not already.
    pub category_completed: bool,
}

impl AzkarDay {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn count(&self, category: &str, item: &str) -> u32 {
        self.counts
            .get(category)
            .and_then(|items| items.get(item))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_completed(&self, category: &str) -> bool {
        self.completed.contains(category)
    }

    fn all_done(&self, cat: &AzkarCategory) -> bool {
        cat.items.iter().all(|i| self.count(cat.id, i.id) >= i.max_count)
    }

    /// Count `times` recitations of an item. Counts stop at the item's
    /// maximum; tapping a full item changes nothing.
    pub fn tap(&mut self, category_id: &str, item_id: &str, times: u32) -> Result<TapOutcome, FaithError> {
        let cat = category(category_id)?;
        let item = cat.item(item_id)?;

        let current = self.count(cat.id, item.id);
        let count = current.saturating_add(times).min(item.max_count);
        if count != current {
            self.counts
                .entry(cat.id.to_string())
                .or_default()
                .insert(item.id.to_string(), count);
        }

        let was_done = self.is_completed(cat.id);
        let category_completed = !was_done && self.all_done(cat);
        if category_completed {
            self.completed.insert(cat.id.to_string());
        }

        Ok(TapOutcome {
            count,
            max_count: item.max_count,
            category_completed,
        })
    }

    /// Clear a category's counters and its completed mark.
    pub fn reset(&mut self, category_id: &str) -> Result<(), FaithError> {
        let cat = category(category_id)?;
        self.counts.remove(cat.id);
        self.completed.remove(cat.id);
        Ok(())
    }

    /// (done, total) recitations in a category.
    pub fn category_progress(&self, cat: &AzkarCategory) -> (u32, u32) {
        cat.items.iter().fold((0, 0), |(done, total), i| {
            (done + self.count(cat.id, i.id).min(i.max_count), total + i.max_count)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> AzkarDay {
        AzkarDay::new(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
    }

    #[test]
    fn completes_sleep_category_once() {
        let mut day = today();
        let r = day.tap("sleep", "sl1", 1).unwrap();
        assert!(!r.category_completed);
        let r = day.tap("sleep", "sl2", 40).unwrap();
        assert_eq!(r.count, 33);
        assert!(r.category_completed);
        assert!(day.is_completed("sleep"));

        let r = day.tap("sleep", "sl2", 1).unwrap();
        assert_eq!(r.count, 33);
        assert!(!r.category_completed);
    }

    #[test]
    fn counts_are_bounded_by_max() {
        let mut day = today();
        for _ in 0..5 {
            day.tap("general", "g1", 1).unwrap();
        }
        assert_eq!(day.count("general", "g1"), 3);
        assert_eq!(day.category_progress(category("general").unwrap()), (3, 103));
    }

    #[test]
    fn reset_clears_counts_and_completion() {
        let mut day = today();
        day.tap("sleep", "sl1", 1).unwrap();
        day.tap("sleep", "sl2", 33).unwrap();
        day.reset("sleep").unwrap();
        assert_eq!(day.count("sleep", "sl2"), 0);
        assert!(!day.is_completed("sleep"));
    }

    #[test]
    fn unknown_names_are_errors() {
        let mut day = today();
        assert_eq!(
            day.tap("night", "n1", 1),
            Err(FaithError::UnknownCategory("night".into()))
        );
        assert!(matches!(day.tap("sleep", "zz", 1), Err(FaithError::UnknownItem { .. })));
    }

    #[test]
    fn catalogue_points_have_config_entries() {
        let points = crate::config::PointsConfig::default();
        for cat in CATALOGUE {
            assert!(points.azkar.contains_key(cat.id), "{}", cat.id);
            assert!(cat.items.iter().all(|i| i.max_count >= 1));
        }
    }
}
