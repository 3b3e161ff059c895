//! Plan-request builder: turns profile preferences, session history and the
//! exercise catalog into the instruction text sent to the generator.
//!
//! Pure functions only; the same input always yields the same prompt.

use chrono::NaiveDate;

use crate::models::{Goal, Intent, Unit};

pub const SYSTEM_PERSONA: &str = "You are an experienced fitness trainer. \
Considering the user's goal, available time, training intent, and recent history, \
propose the best workout menu. You must choose only from the user's registered \
exercise list, copying exercise names exactly. Reply in JSON format.";

/// One exercise line from a past session, used to anchor load suggestions.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub name: String,
    pub sets: i64,
    pub reps: i64,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct SessionHistory {
    pub date: NaiveDate,
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug)]
pub struct PlanPromptInput<'a> {
    pub goal: Goal,
    pub unit: Unit,
    pub duration: i64,
    pub intent: Intent,
    pub recent_sessions: &'a [SessionHistory],
    pub exercise_names: &'a [String],
}

fn goal_text(goal: Goal) -> &'static str {
    match goal {
        Goal::Cutting => "cutting (high reps, short rest)",
        Goal::Hypertrophy => "hypertrophy (moderate reps, moderate rest)",
        Goal::Strength => "strength (low reps, long rest)",
    }
}

fn intent_text(intent: Intent) -> &'static str {
    match intent {
        Intent::TimeSaving => "save time (fewer exercises, efficient)",
        Intent::Weight => "prioritize load (heavy weight, low reps)",
        Intent::Volume => "prioritize volume (more sets)",
        Intent::Form => "prioritize form (lighter weight, lower RPE)",
    }
}

/// Build the generation prompt. The catalog section is omitted entirely when
/// the user has no exercises yet; the builder itself never fails.
pub fn build_plan_prompt(input: &PlanPromptInput) -> String {
    let mut available_exercises = String::new();
    if !input.exercise_names.is_empty() {
        available_exercises.push_str(
            "\n\nAvailable exercise list (exercise_name must be copied exactly from this list):\n",
        );
        for name in input.exercise_names {
            available_exercises.push_str(&format!("- {}\n", name));
        }
    }

    let mut recent_history = String::new();
    if !input.recent_sessions.is_empty() {
        recent_history
            .push_str("\n\nRecent training history (use these weights as a reference):\n");
        for (idx, session) in input.recent_sessions.iter().enumerate() {
            recent_history.push_str(&format!("{}. {}:\n", idx + 1, session.date));
            for entry in &session.entries {
                recent_history.push_str(&format!(
                    "  - {}: {} sets x {} reps",
                    entry.name, entry.sets, entry.reps
                ));
                if let Some(weight) = entry.weight {
                    recent_history.push_str(&format!(" @ {}{}", weight, input.unit.as_str()));
                }
                recent_history.push('\n');
            }
        }
    }

    format!(
        r#"Propose a workout menu under the following conditions.

## User information
- Goal: {goal}
- Unit: {unit}
- Available time: {duration} minutes
- Intent for this session: {intent}
{available_exercises}{recent_history}

## Menu guidelines
1. **Exercise selection requirements**:
   - Copy exercise_name character-for-character from the "Available exercise list" above
   - Do not add parentheses or extra information
   - Example: if the list says "Bench Press", write "Bench Press", not "Bench Press (chest) [barbell]"
2. **Number of exercises**: pick 3-5 depending on available time
3. **Body-part balance**: avoid the same body part in consecutive exercises, balance the whole body
4. **Sets and reps**: set appropriately for the goal and intent
   - Cutting: high reps (12-15), short rest (60-90s)
   - Hypertrophy: moderate reps (8-12), moderate rest (90-120s)
   - Strength: low reps (4-6), long rest (180-240s)
5. **RPE**: set an appropriate target RPE (1-10) for the goal
   - Form priority: RPE 6-7
   - Normal: RPE 7-8
   - Load priority: RPE 8-9
6. **Weight**:
   - If the history has the same exercise, suggest a weight based on it
   - **With no history, safety first: suggest a very light weight**
     - Barbell lifts (squat, bench press, deadlift): 20kg (empty bar)
     - Dumbbell exercises: 5-10kg
     - Machine exercises: 10-20kg
   - Whatever the intent (including load priority), always start light to check form the first time
   - Set null only when completely unknown
7. **reps**: always return a number (no string ranges)
8. **Notes**: give brief advice for each exercise

## Response format
Reply with the following JSON shape:

{{
  "exercises": [
    {{
      "exercise_name": "name copied exactly from the list",
      "sets": 4,
      "reps": 10,
      "weight": null,
      "rest_seconds": 90,
      "target_rpe": 8,
      "notes": "exercise-specific advice"
    }}
  ],
  "overall_notes": "overall advice for the whole menu"
}}"#,
        goal = goal_text(input.goal),
        unit = input.unit.as_str(),
        duration = input.duration,
        intent = intent_text(input.intent),
        available_exercises = available_exercises,
        recent_history = recent_history,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(
        names: &'a [String],
        history: &'a [SessionHistory],
    ) -> PlanPromptInput<'a> {
        PlanPromptInput {
            goal: Goal::Hypertrophy,
            unit: Unit::Kg,
            duration: 30,
            intent: Intent::Form,
            recent_sessions: history,
            exercise_names: names,
        }
    }

    #[test]
    fn test_catalog_names_appear_verbatim() {
        let names = vec![
            "Bench Press".to_string(),
            "Bulgarian Split Squat".to_string(),
            "Lat Pulldown".to_string(),
        ];
        let prompt = build_plan_prompt(&input(&names, &[]));

        for name in &names {
            assert!(prompt.contains(&format!("- {}\n", name)));
        }
    }

    #[test]
    fn test_empty_catalog_omits_list_section() {
        let prompt = build_plan_prompt(&input(&[], &[]));
        assert!(!prompt.contains("exercise_name must be copied exactly from this list"));
        // Still a complete prompt
        assert!(prompt.contains("Available time: 30 minutes"));
        assert!(prompt.contains("overall_notes"));
    }

    #[test]
    fn test_history_weights_are_included() {
        let history = vec![SessionHistory {
            date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            entries: vec![HistoryEntry {
                name: "Squat".to_string(),
                sets: 5,
                reps: 5,
                weight: Some(100.0),
            }],
        }];
        let prompt = build_plan_prompt(&input(&[], &history));
        assert!(prompt.contains("Squat: 5 sets x 5 reps @ 100kg"));
        assert!(prompt.contains("2026-08-20"));
    }

    #[test]
    fn test_no_history_omits_history_section() {
        let prompt = build_plan_prompt(&input(&[], &[]));
        assert!(!prompt.contains("Recent training history"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let names = vec!["Deadlift".to_string()];
        let a = build_plan_prompt(&input(&names, &[]));
        let b = build_plan_prompt(&input(&names, &[]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_unit_appears_in_user_info() {
        let mut i = input(&[], &[]);
        i.unit = Unit::Lb;
        let prompt = build_plan_prompt(&i);
        assert!(prompt.contains("Unit: lb"));
    }
}
