use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};

use crate::time::display_minute_of_day;
use crate::{FeedError, StopID, Trip};

/// All of the departures from one stop over a day, ready to show in a table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopScheduleEntry {
    pub stop_id: StopID,
    pub stop_name: String,
    /// Deduplicated `H:MM AM/PM` strings, earliest on the wall clock first
    pub times: Vec<String>,
}

/// Groups every departure of every trip by stop. Times are deduplicated and ordered by their
/// display string, so two service times with the same wall clock reading collapse into one
/// entry. Stops are ordered by name, ignoring case and collating accented letters with their
/// base letter.
pub fn build_stop_schedule(trips: &[Trip]) -> Result<Vec<StopScheduleEntry>, FeedError> {
    let mut per_stop: BTreeMap<&StopID, (&str, BTreeSet<String>)> = BTreeMap::new();
    for trip in trips {
        for st in &trip.stop_times {
            let (name, times) = per_stop
                .entry(&st.stop_id)
                .or_insert_with(|| (st.stop_name.as_str(), BTreeSet::new()));
            // Trips sometimes disagree about a stop's name. Keep the smallest, independent of
            // trip order.
            if st.stop_name.as_str() < *name {
                *name = st.stop_name.as_str();
            }
            times.insert(st.departure_time.format_display());
        }
    }

    let mut entries = Vec::new();
    for (stop_id, (stop_name, times)) in per_stop {
        let mut keyed = Vec::new();
        for time in times {
            keyed.push((display_minute_of_day(&time)?, time));
        }
        keyed.sort();
        entries.push(StopScheduleEntry {
            stop_id: stop_id.clone(),
            stop_name: stop_name.to_string(),
            times: keyed.into_iter().map(|(_, time)| time).collect(),
        });
    }
    let collator = stop_name_collator();
    entries.sort_by(|a, b| {
        compare_names(collator.as_ref(), &a.stop_name, &b.stop_name)
            .then_with(|| a.stop_id.cmp(&b.stop_id))
    });
    Ok(entries)
}

/// Root-locale collation at secondary strength: case is ignored, accents still count after the
/// base letters.
fn stop_name_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(err) => {
            warn!("Can't load collation data, sorting stop names by code point: {err:?}");
            None
        }
    }
}

fn compare_names(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    let folded = match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    };
    folded.then_with(|| a.cmp(b))
}

/// Keeps entries whose stop name contains the query. "&" and "at" style variants match each
/// other. A blank query keeps everything.
pub fn search<'a>(query: &str, entries: &'a [StopScheduleEntry]) -> Vec<&'a StopScheduleEntry> {
    if query.trim().is_empty() {
        return entries.iter().collect();
    }
    let query = normalize_for_search(query);
    entries
        .iter()
        .filter(|entry| normalize_for_search(&entry.stop_name).contains(&query))
        .collect()
}

fn normalize_for_search(x: &str) -> String {
    x.to_lowercase().replace('&', "and").replace('@', "at")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ServiceTime, StopTime};

    fn trip(stop_times: &[(&str, &str, &str)]) -> Trip {
        Trip {
            trip_id: None,
            stop_times: stop_times
                .iter()
                .map(|(id, name, time)| StopTime {
                    stop_id: StopID::new(*id),
                    stop_name: name.to_string(),
                    departure_time: ServiceTime::parse(time).unwrap(),
                })
                .collect(),
        }
    }

    fn entry(id: &str, name: &str, times: &[&str]) -> StopScheduleEntry {
        StopScheduleEntry {
            stop_id: StopID::new(id),
            stop_name: name.to_string(),
            times: times.iter().map(|x| x.to_string()).collect(),
        }
    }

    #[test]
    fn test_two_trips_one_stop() {
        let trips = vec![
            trip(&[("A", "Main St", "08:00:00")]),
            trip(&[("A", "Main St", "20:05:00")]),
        ];
        assert_eq!(
            build_stop_schedule(&trips).unwrap(),
            vec![entry("A", "Main St", &["8:00 AM", "8:05 PM"])]
        );
    }

    #[test]
    fn test_empty() {
        assert!(build_stop_schedule(&[]).unwrap().is_empty());
        assert!(build_stop_schedule(&[trip(&[])]).unwrap().is_empty());
    }

    #[test]
    fn test_dedupes_display_strings() {
        let trips = vec![
            trip(&[("A", "Main St", "08:00:00")]),
            trip(&[("A", "Main St", "08:00:00")]),
            // Same minute, different seconds
            trip(&[("A", "Main St", "08:00:30")]),
        ];
        let schedule = build_stop_schedule(&trips).unwrap();
        assert_eq!(schedule[0].times, vec!["8:00 AM"]);
    }

    #[test]
    fn test_service_day_overflow_collapses() {
        // 25:30 and 01:30 render the same, and both sort before the evening
        let trips = vec![
            trip(&[("A", "Main St", "23:50:00")]),
            trip(&[("A", "Main St", "25:30:00")]),
            trip(&[("A", "Main St", "01:30:00")]),
            trip(&[("A", "Main St", "12:00:00")]),
            trip(&[("A", "Main St", "00:15:00")]),
        ];
        let schedule = build_stop_schedule(&trips).unwrap();
        assert_eq!(
            schedule[0].times,
            vec!["12:15 AM", "1:30 AM", "12:00 PM", "11:50 PM"]
        );
    }

    #[test]
    fn test_stops_sorted_by_name_ignoring_case() {
        let trips = vec![trip(&[
            ("3", "walnut St", "09:00:00"),
            ("1", "Kirkwood Ave", "09:05:00"),
            ("2", "atwater Ave", "09:10:00"),
            ("4", "Atwater Ave", "09:15:00"),
        ])];
        let names: Vec<String> = build_stop_schedule(&trips)
            .unwrap()
            .into_iter()
            .map(|e| e.stop_name)
            .collect();
        assert_eq!(
            names,
            vec!["Atwater Ave", "atwater Ave", "Kirkwood Ave", "walnut St"]
        );
    }

    #[test]
    fn test_accented_names_sort_with_their_base_letter() {
        let trips = vec![trip(&[
            ("1", "Zoo Rd", "09:00:00"),
            ("2", "École St", "09:05:00"),
            ("3", "Fifth St", "09:10:00"),
            ("4", "ecole St", "09:15:00"),
            ("5", "Élan Ave", "09:20:00"),
        ])];
        let names: Vec<String> = build_stop_schedule(&trips)
            .unwrap()
            .into_iter()
            .map(|e| e.stop_name)
            .collect();
        assert_eq!(
            names,
            vec!["ecole St", "École St", "Élan Ave", "Fifth St", "Zoo Rd"]
        );
    }

    #[test]
    fn test_conflicting_stop_names() {
        let trips = vec![
            trip(&[("A", "Main Street", "08:00:00")]),
            trip(&[("A", "Main St", "09:00:00")]),
        ];
        let forwards = build_stop_schedule(&trips).unwrap();
        assert_eq!(forwards[0].stop_name, "Main St");
        let mut reversed = trips.clone();
        reversed.reverse();
        assert_eq!(forwards, build_stop_schedule(&reversed).unwrap());
    }

    #[test]
    fn test_independent_of_trip_order() {
        let trips = vec![
            trip(&[("A", "Main St", "08:00:00"), ("B", "3rd St", "08:10:00")]),
            trip(&[("B", "3rd St", "07:10:00"), ("C", "College Mall", "26:00:00")]),
            trip(&[("A", "Main St", "17:45:00"), ("C", "College Mall", "14:00:00")]),
        ];
        let forwards = build_stop_schedule(&trips).unwrap();
        let mut reversed = trips.clone();
        reversed.reverse();
        assert_eq!(forwards, build_stop_schedule(&reversed).unwrap());
        reversed.swap(0, 1);
        assert_eq!(forwards, build_stop_schedule(&reversed).unwrap());
    }

    #[test]
    fn test_search() {
        let entries = vec![
            entry("1", "5th and Main St", &[]),
            entry("2", "Kirkwood @ Dunn", &[]),
            entry("3", "Walnut St", &[]),
        ];

        let hits = search("5th & Main", &entries);
        assert_eq!(hits, vec![&entries[0]]);

        let hits = search("kirkwood at", &entries);
        assert_eq!(hits, vec![&entries[1]]);

        let hits = search("ST", &entries);
        assert_eq!(hits, vec![&entries[0], &entries[2]]);

        assert_eq!(search("   ", &entries).len(), 3);
        assert_eq!(search("", &entries).len(), 3);
        assert!(search("bloomfield", &entries).is_empty());
    }
}
