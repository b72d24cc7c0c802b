//! Strict conversion of the best candidate into persistable records.
//!
//! The evolutionary search tolerates violations and prices them into
//! fitness; nothing tolerated there may reach persistence. The
//! materializer replays the winning candidate through fresh conflict
//! ledgers and demotes every gene that fails a check to the unscheduled
//! report instead of erroring the whole run.
//!
//! Genes are walked in positional order, so when two genes contend the
//! earlier one wins and the later one is demoted.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::warn;

use crate::ga::Candidate;
use crate::models::{
    fmt_slot, is_grid_slot, ExamRecord, ProctorId, ScheduleOutcome, Section, SlotMin,
    UnscheduledSection, DAY_END_CUTOFF_MIN,
};
use crate::problem::{ExamProblem, GroupKey};
use crate::tracker::OccupancyTracker;

/// Converts a candidate into accepted records plus an unscheduled
/// report. Every gene lands in exactly one of the two lists.
pub fn materialize(problem: &ExamProblem, candidate: &Candidate) -> ScheduleOutcome {
    let duration = problem.duration_min();
    let mut rooms: OccupancyTracker<String> = OccupancyTracker::new();
    let mut proctors: OccupancyTracker<ProctorId> = OccupancyTracker::new();
    let mut group_binding: HashMap<GroupKey, (NaiveDate, SlotMin)> = HashMap::new();
    let mut outcome = ScheduleOutcome::new();

    for (idx, gene) in candidate.genes.iter().enumerate() {
        let section = problem.section(idx);
        let start = gene.slot_min;
        let end = start + duration;

        let rejection = check_gene(
            problem,
            section,
            gene.date,
            start,
            end,
            gene.room_id.as_deref(),
            gene.proctor_id,
            &rooms,
            &proctors,
            &mut group_binding,
        );
        if let Some(reason) = rejection {
            warn!(
                section_id = section.id,
                course = %section.course_id,
                %reason,
                "section demoted to unscheduled"
            );
            outcome.unscheduled.push(UnscheduledSection {
                section_id: section.id,
                course_id: section.course_id.clone(),
                section_names: section.section_names.clone(),
                reason,
            });
            continue;
        }

        // Checks passed; both resources are present and free.
        let (Some(room_id), Some(proctor_id)) = (gene.room_id.clone(), gene.proctor_id) else {
            continue;
        };
        rooms.reserve(room_id.clone(), gene.date, start, end);
        proctors.reserve(proctor_id, gene.date, start, end);

        let proctor_ids = staff_sub_sections(
            problem,
            section,
            proctor_id,
            gene.date,
            start,
            end,
            &mut proctors,
        );

        let start_ts = gene.date.and_time(NaiveTime::MIN) + Duration::minutes(start as i64);
        let end_ts = start_ts + Duration::minutes(duration as i64);
        let college_id = problem.college_of(section).to_string();
        let period_label = problem
            .period_for(gene.date)
            .map(|p| p.label.clone())
            .unwrap_or_default();
        let labels = problem.labels();

        outcome.scheduled.push(ExamRecord {
            program_id: section.program_id.clone(),
            course_id: section.course_id.clone(),
            section_id: section.id,
            section_names: section.section_names.clone(),
            room_id: room_id.clone(),
            date: gene.date,
            start: start_ts,
            end: end_ts,
            duration_min: duration,
            academic_year: labels.academic_year.clone(),
            semester: labels.semester.clone(),
            exam_category: labels.exam_category.clone(),
            exam_period: period_label,
            college_name: problem.tables().college_name(&college_id).to_string(),
            building_name: problem.tables().building_of(&room_id).to_string(),
            proctor_id: Some(proctor_id),
            proctor_ids,
            proctor_time_in: None,
            proctor_time_out: None,
        });
    }

    outcome
}

/// Runs the rejection checks for one gene. `None` means accepted.
#[allow(clippy::too_many_arguments)]
fn check_gene(
    problem: &ExamProblem,
    section: &Section,
    date: NaiveDate,
    start: SlotMin,
    end: SlotMin,
    room_id: Option<&str>,
    proctor_id: Option<ProctorId>,
    rooms: &OccupancyTracker<String>,
    proctors: &OccupancyTracker<ProctorId>,
    group_binding: &mut HashMap<GroupKey, (NaiveDate, SlotMin)>,
) -> Option<String> {
    if !is_grid_slot(start) {
        return Some(format!("start time {} is off the slot grid", fmt_slot(start)));
    }
    if end > DAY_END_CUTOFF_MIN {
        return Some(format!(
            "exam ending at {} runs past the daily cutoff",
            fmt_slot(end)
        ));
    }
    if problem.period_for(date).is_none() {
        return Some(format!("date {date} is outside every approved exam period"));
    }

    let key = problem.group_key(section);
    let bound = group_binding.entry(key).or_insert((date, start));
    if *bound != (date, start) {
        return Some(format!(
            "course group already placed on {} at {}",
            bound.0,
            fmt_slot(bound.1)
        ));
    }

    let Some(room) = room_id else {
        return Some("no room assigned".to_string());
    };
    if !rooms.is_free(&room.to_string(), date, start, end) {
        return Some(format!("room {room} is already booked at this time"));
    }

    let Some(proctor) = proctor_id else {
        return Some("no proctor assigned".to_string());
    };
    if !proctors.is_free(&proctor, date, start, end) {
        return Some(format!(
            "proctor {proctor} already has an exam at this time"
        ));
    }

    None
}

/// Best-effort proctor per named sub-section, aligned with
/// `section_names`. The gene's proctor covers the first name; later
/// names try their declared instructor, then any free available
/// proctor, avoiding reuse within the sitting. Unstaffable names get
/// `None` and are left for manual assignment.
fn staff_sub_sections(
    problem: &ExamProblem,
    section: &Section,
    primary: ProctorId,
    date: NaiveDate,
    start: SlotMin,
    end: SlotMin,
    proctors: &mut OccupancyTracker<ProctorId>,
) -> Vec<Option<ProctorId>> {
    let available = problem.availability().available_proctors(date, start);
    let mut used: HashSet<ProctorId> = HashSet::new();
    used.insert(primary);

    let mut result = Vec::with_capacity(section.section_names.len());
    result.push(Some(primary));

    for i in 1..section.section_names.len() {
        let pick = section
            .instructor_ids
            .get(i)
            .copied()
            .filter(|p| !used.contains(p) && proctors.is_free(p, date, start, end))
            .or_else(|| {
                available
                    .iter()
                    .copied()
                    .find(|p| !used.contains(p) && proctors.is_free(p, date, start, end))
            });
        if let Some(p) = pick {
            used.insert(p);
            proctors.reserve(p, date, start, end);
        }
        result.push(pick);
    }
    result
}
