//! Aggregation engine: read-only rollups of activity, DORA, and insight
//! records against the user hierarchy.
//!
//! Every operation runs its joined sub-queries under one store snapshot, so
//! a single call never observes a half-applied write. Missing optional
//! sub-resources (no activities, no DORA row, no insight yet) degrade to
//! zero or `None`; only a missing user is an error.

use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};
use crate::gamify::{badges_for, normalize_profile, RadarProfile};
use crate::store::Store;
use crate::types::{Badge, DoraMetric, Persona, Task, User};

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// One direct report in a manager's team rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub score: i64,
    pub dora: Option<DoraMetric>,
}

/// One employee row on the global dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardRow {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub total_score: i64,
    pub cluster_label: Option<Persona>,
}

/// Full profile view for one employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub user: User,
    pub manager_name: Option<String>,
    pub tasks: Vec<Task>,
    pub dora: Option<DoraMetric>,
    pub score: i64,
    pub badges: Vec<Badge>,
    pub radar: Option<RadarProfile>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Every user reporting to `manager_id`, annotated with score and current
/// DORA snapshot. Ordered by user id ascending, which doubles as the
/// deterministic tie-break for equal scores.
pub fn team_overview(store: &Store, manager_id: i64) -> Result<Vec<TeamMember>> {
    store.with_snapshot(|store| {
        let mut team = Vec::new();
        for user in store.direct_reports(manager_id)? {
            team.push(TeamMember {
                score: store.score_of(user.id)?,
                dora: store.dora_of(user.id)?,
                id: user.id,
                name: user.name,
                department: user.department,
            });
        }
        Ok(team)
    })
}

/// Every Employee with score and latest insight label, ordered by score
/// descending, ties broken by user id ascending.
pub fn global_dashboard(store: &Store) -> Result<Vec<DashboardRow>> {
    store.with_snapshot(|store| {
        let mut rows = Vec::new();
        for user in store.employees()? {
            rows.push(DashboardRow {
                total_score: store.score_of(user.id)?,
                cluster_label: store.latest_insight_of(user.id)?.map(|i| i.persona),
                id: user.id,
                name: user.name,
                department: user.department,
            });
        }
        rows.sort_by(|a, b| b.total_score.cmp(&a.total_score).then(a.id.cmp(&b.id)));
        Ok(rows)
    })
}

/// The user, their resolved manager name, all tasks, current DORA snapshot,
/// and derived gamification views. Fails only when the user itself is
/// missing.
pub fn employee_profile(store: &Store, user_id: i64) -> Result<EmployeeProfile> {
    store.with_snapshot(|store| {
        let user = store
            .user(user_id)?
            .ok_or(ForgeError::UserNotFound(user_id))?;

        let manager_name = match user.manager_id {
            Some(mid) => store.user(mid)?.map(|m| m.name),
            None => None,
        };
        let tasks = store.tasks_of(user.id)?;
        let dora = store.dora_of(user.id)?;
        let score = store.score_of(user.id)?;

        Ok(EmployeeProfile {
            manager_name,
            tasks,
            radar: dora.as_ref().map(normalize_profile),
            dora,
            score,
            badges: badges_for(score),
            user,
        })
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewUser;
    use crate::types::Role;
    use chrono::Utc;

    fn add_user(store: &Store, name: &str, role: Role, manager_id: Option<i64>) -> User {
        store
            .insert_user(NewUser {
                name: name.into(),
                role,
                department: "Backend".into(),
                manager_id,
            })
            .unwrap()
    }

    #[test]
    fn team_overview_sums_points_per_report() {
        let store = Store::in_memory().unwrap();
        let m = add_user(&store, "Mira", Role::Manager, None);
        let u = add_user(&store, "Ada", Role::Employee, Some(m.id));

        for points in [100, 50, 25] {
            store.insert_activity(u.id, "PR_MERGE", points).unwrap();
        }

        let team = team_overview(&store, m.id).unwrap();
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].score, 175);
        assert!(team[0].dora.is_none());
    }

    #[test]
    fn team_overview_is_empty_for_manager_without_reports() {
        let store = Store::in_memory().unwrap();
        let m = add_user(&store, "Mira", Role::Manager, None);
        assert!(team_overview(&store, m.id).unwrap().is_empty());
    }

    #[test]
    fn dashboard_orders_by_score_desc_then_id() {
        let store = Store::in_memory().unwrap();
        let a = add_user(&store, "Ada", Role::Employee, None);
        let b = add_user(&store, "Bo", Role::Employee, None);
        let c = add_user(&store, "Cy", Role::Employee, None);
        add_user(&store, "Mira", Role::Manager, None);

        store.insert_activity(b.id, "PR_MERGE", 300).unwrap();
        store.insert_activity(a.id, "PR_MERGE", 100).unwrap();
        store.insert_activity(c.id, "PR_MERGE", 100).unwrap();

        let rows = global_dashboard(&store).unwrap();
        assert_eq!(
            rows.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![b.id, a.id, c.id],
            "score descending, equal scores by id ascending, managers excluded"
        );
    }

    #[test]
    fn dashboard_shows_latest_insight_label() {
        let store = Store::in_memory().unwrap();
        let u = add_user(&store, "Ada", Role::Employee, None);
        store
            .insert_insight(u.id, Persona::Guardian, "Solid reviews!", Utc::now())
            .unwrap();

        let rows = global_dashboard(&store).unwrap();
        assert_eq!(rows[0].cluster_label, Some(Persona::Guardian));
        assert_eq!(rows[0].total_score, 0);
    }

    #[test]
    fn profile_resolves_manager_and_tolerates_missing_extras() {
        let store = Store::in_memory().unwrap();
        let m = add_user(&store, "Mira", Role::Manager, None);
        let u = add_user(&store, "Ada", Role::Employee, Some(m.id));

        let profile = employee_profile(&store, u.id).unwrap();
        assert_eq!(profile.manager_name.as_deref(), Some("Mira"));
        assert!(profile.tasks.is_empty());
        assert!(profile.dora.is_none());
        assert!(profile.radar.is_none());
        assert_eq!(profile.score, 0);
        assert_eq!(profile.badges, vec![Badge::Novice]);
    }

    #[test]
    fn profile_includes_derived_gamification() {
        let store = Store::in_memory().unwrap();
        let u = add_user(&store, "Ada", Role::Employee, None);
        store.insert_activity(u.id, "PR_MERGE", 600).unwrap();
        store
            .upsert_dora(
                u.id,
                &DoraMetric {
                    deployment_freq: 4.0,
                    lead_time: 24.0,
                    change_failure_rate: 6.0,
                },
            )
            .unwrap();

        let profile = employee_profile(&store, u.id).unwrap();
        assert_eq!(profile.score, 600);
        assert_eq!(profile.badges, vec![Badge::Novice, Badge::CodeNinja]);
        let radar = profile.radar.unwrap();
        assert_eq!(radar.speed, 40.0);
        assert_eq!(radar.quality, 70.0);
    }

    #[test]
    fn profile_of_unknown_user_is_not_found() {
        let store = Store::in_memory().unwrap();
        let err = employee_profile(&store, 77).unwrap_err();
        assert!(matches!(err, ForgeError::UserNotFound(77)));
    }
}
