use std::path::Path;

use forgeboard_core::store::{NewUser, Store};
use forgeboard_core::task::{create_task, NewTask};
use forgeboard_core::types::{DoraMetric, Priority, Role};

/// Deterministic demo hierarchy: two managers, six employees, tasks,
/// activities, and DORA snapshots. Intended for local development only.
pub fn run(db: &Path) -> anyhow::Result<()> {
    let store = Store::open(db)?;
    let counts = seed(&store)?;
    println!(
        "seeded {} users, {} tasks, {} activities",
        counts.users, counts.tasks, counts.activities
    );
    Ok(())
}

pub struct SeedCounts {
    pub users: usize,
    pub tasks: usize,
    pub activities: usize,
}

const DEPARTMENTS: [&str; 4] = ["Frontend", "Backend", "DevOps", "Mobile"];

fn seed(store: &Store) -> anyhow::Result<SeedCounts> {
    let mut counts = SeedCounts {
        users: 0,
        tasks: 0,
        activities: 0,
    };

    let managers: Vec<i64> = ["Mira Chen", "Rohan Iyer"]
        .iter()
        .map(|name| {
            counts.users += 1;
            Ok(store
                .insert_user(NewUser {
                    name: name.to_string(),
                    role: Role::Manager,
                    department: "Engineering".into(),
                    manager_id: None,
                })?
                .id)
        })
        .collect::<anyhow::Result<_>>()?;

    let employees = [
        "Ada Okafor",
        "Bo Lindqvist",
        "Carmen Díaz",
        "Dev Patel",
        "Eve Morrow",
        "Felix Abara",
    ];

    for (i, name) in employees.iter().enumerate() {
        let user = store.insert_user(NewUser {
            name: name.to_string(),
            role: Role::Employee,
            department: DEPARTMENTS[i % DEPARTMENTS.len()].into(),
            manager_id: Some(managers[i % managers.len()]),
        })?;
        counts.users += 1;

        for k in 0..3 {
            create_task(
                store,
                NewTask {
                    user_id: user.id,
                    title: format!("Fix critical bug #{k} in {}", DEPARTMENTS[i % 4]),
                    deadline: format!("2026-09-{:02}", 10 + k),
                    priority: Some(if k == 0 {
                        Priority::High
                    } else {
                        Priority::Medium
                    }),
                },
            )?;
            counts.tasks += 1;
        }

        store.upsert_dora(
            user.id,
            &DoraMetric {
                deployment_freq: 1.0 + i as f64,
                lead_time: 12.0 + 4.0 * i as f64,
                change_failure_rate: 2.0 * i as f64,
            },
        )?;

        for (kind, points) in [
            ("PR_MERGE", 150),
            ("REVIEW", 40 * (i as i64 + 1)),
            ("BUG_FIX", 25),
        ] {
            store.insert_activity(user.id, kind, points)?;
            counts.activities += 1;
        }
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgeboard_core::aggregate;

    #[test]
    fn seed_produces_a_queryable_hierarchy() {
        let store = Store::in_memory().unwrap();
        let counts = seed(&store).unwrap();
        assert_eq!(counts.users, 8);
        assert_eq!(counts.tasks, 18);

        let rows = aggregate::global_dashboard(&store).unwrap();
        assert_eq!(rows.len(), 6);
        assert!(rows[0].total_score >= rows[rows.len() - 1].total_score);

        let profile = aggregate::employee_profile(&store, rows[0].id).unwrap();
        assert!(profile.manager_name.is_some());
        assert_eq!(profile.tasks.len(), 3);
        assert!(profile.dora.is_some());
    }
}
