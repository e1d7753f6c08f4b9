use serde::{Deserialize, Serialize};

/// 任务状态分布中的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// 仪表盘统计信息, 按调用者角色区分形态
///
/// `scope` 字段作为判别标签, 客户端据此选择渲染哪一组键。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum DashboardStats {
    #[serde(rename_all = "camelCase")]
    Admin {
        total_employees: u64,
        total_tasks: u64,
        completed_tasks: u64,
        completion_rate: f64,
        tasks_by_status: Vec<StatusCount>,
    },
    #[serde(rename_all = "camelCase")]
    User {
        my_tasks: u64,
        completed_tasks: u64,
        completion_rate: f64,
        tasks_by_status: Vec<StatusCount>,
    },
}

impl DashboardStats {
    /// 完成率 = completed / total * 100, 保留一位小数, 无任务时为 0
    pub fn completion_rate(completed: u64, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let rate = completed as f64 / total as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_rate_zero_tasks() {
        assert_eq!(DashboardStats::completion_rate(0, 0), 0.0);
    }

    #[test]
    fn test_completion_rate_one_of_three() {
        assert_eq!(DashboardStats::completion_rate(1, 3), 33.3);
    }

    #[test]
    fn test_completion_rate_two_of_three() {
        assert_eq!(DashboardStats::completion_rate(2, 3), 66.7);
    }

    #[test]
    fn test_completion_rate_all_completed() {
        assert_eq!(DashboardStats::completion_rate(3, 3), 100.0);
    }

    #[test]
    fn test_admin_stats_serialization() {
        let stats = DashboardStats::Admin {
            total_employees: 4,
            total_tasks: 10,
            completed_tasks: 5,
            completion_rate: 50.0,
            tasks_by_status: vec![StatusCount {
                status: "completed".to_string(),
                count: 5,
            }],
        };

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["scope"], "admin");
        assert_eq!(value["totalEmployees"], 4);
        assert_eq!(value["totalTasks"], 10);
        assert_eq!(value["completedTasks"], 5);
        assert_eq!(value["completionRate"], 50.0);
        assert_eq!(value["tasksByStatus"][0]["status"], "completed");
        assert_eq!(value["tasksByStatus"][0]["count"], 5);
    }

    #[test]
    fn test_user_stats_serialization() {
        let stats = DashboardStats::User {
            my_tasks: 3,
            completed_tasks: 1,
            completion_rate: 33.3,
            tasks_by_status: vec![],
        };

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["scope"], "user");
        assert_eq!(value["myTasks"], 3);
        assert_eq!(value["completedTasks"], 1);
        assert_eq!(value["completionRate"], 33.3);
        assert!(value.get("totalEmployees").is_none());
    }

    #[test]
    fn test_stats_round_trip() {
        let stats = DashboardStats::User {
            my_tasks: 2,
            completed_tasks: 2,
            completion_rate: 100.0,
            tasks_by_status: vec![StatusCount {
                status: "completed".to_string(),
                count: 2,
            }],
        };

        let text = serde_json::to_string(&stats).unwrap();
        let parsed: DashboardStats = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, stats);
    }
}
