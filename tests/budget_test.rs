//! Integration tests for budget goals and the current-month evaluation.

mod common;

use axum::http::StatusCode;
use chrono::Datelike;
use common::TestClient;
use serde_json::Value;

async fn scenario_client() -> TestClient {
    let client = TestClient::new();
    assert!(client.create_profile("asha", "50000").await);
    assert!(
        client
            .set_budget("asha", &[("Groceries", "5000"), ("Transport", "4000")])
            .await
    );

    let now = chrono::Local::now();
    assert!(
        client
            .add_expenses(
                "asha",
                &now.month().to_string(),
                &now.year().to_string(),
                &[("Groceries", "6000"), ("Transport", "3000")]
            )
            .await
    );
    client
}

fn category<'a>(summary: &'a Value, name: &str) -> &'a Value {
    summary["budget_status"]["categories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["category"] == name)
        .unwrap()
}

/// Income 50000 with groceries over and transport under budget.
#[tokio::test]
async fn test_budget_scenario_summary() {
    let client = scenario_client().await;

    let (status, summary) = client.get_json::<Value>("/api/users/asha/summary").await;
    assert_eq!(status, StatusCode::OK);
    let summary = summary.unwrap();

    assert_eq!(summary["is_sample"], false);
    assert_eq!(summary["goals_saved"], true);
    assert_eq!(summary["monthly_total"], 9000.0);
    assert_eq!(summary["savings"], 41000.0);
    assert_eq!(summary["savings_percent"], 82.0);
    assert_eq!(summary["category_totals"]["Groceries"], 6000.0);
    assert_eq!(summary["category_totals"]["Eating_Out"], 0.0);

    let groceries = category(&summary, "Groceries");
    assert_eq!(groceries["percentage"], 120.0);
    assert_eq!(groceries["remaining"], -1000.0);
    assert_eq!(groceries["status"], "overspent");

    let transport = category(&summary, "Transport");
    assert_eq!(transport["percentage"], 75.0);
    assert_eq!(transport["remaining"], 1000.0);
    assert_eq!(transport["status"], "on-track");

    let overspent = summary["budget_status"]["overspent"].as_array().unwrap();
    assert_eq!(overspent.len(), 1);
    assert_eq!(overspent[0]["category"], "Groceries");
    assert_eq!(overspent[0]["amount"], 1000.0);
}

/// The budget page shows the progress table with a TOTAL row and suggestions.
#[tokio::test]
async fn test_budget_page() {
    let client = scenario_client().await;

    let (status, body) = client.get("/users/asha/budget").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("TOTAL"));
    assert!(body.contains("\u{20b9}9,000.00"));
    assert!(body.contains("\u{20b9}-1,000.00") || body.contains("-\u{20b9}1,000.00"));
    assert!(body.contains("status-overspent"));
    // Transport at 75%, and the TOTAL row at 100% of the combined budget
    assert!(body.contains("width: 75%"));
    assert!(body.contains("width: 100%"));
    // 82% savings meets the 20% goal and exceeds the investment threshold
    assert!(body.contains("Great job!"));
    assert!(body.contains("Mutual funds"));
    // Groceries in a tier 1 city: 15% of 6000
    assert!(body.contains("\u{20b9}900.00"));
}

/// Without a saved budget, goals default to shares of income.
#[tokio::test]
async fn test_default_goals() {
    let client = TestClient::new();
    assert!(client.create_profile("asha", "50000").await);

    let (status, body) = client.get("/users/asha/budget").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("value=\"10000.00\""));
    assert!(body.contains("value=\"7500.00\""));

    let (_, summary) = client.get_json::<Value>("/api/users/asha/summary").await;
    let summary = summary.unwrap();
    assert_eq!(summary["goals_saved"], false);
    let total_budget = summary["budget_status"]["total_budget"].as_f64().unwrap();
    assert!((total_budget - 40000.0).abs() < 1e-6);
}

/// Saving goals replaces the whole set and raises a notification.
#[tokio::test]
async fn test_save_goals_replaces() {
    let client = TestClient::new();
    assert!(client.create_profile("asha", "50000").await);

    assert!(client.set_budget("asha", &[("Groceries", "5000")]).await);
    assert!(client.set_budget("asha", &[("Healthcare", "700")]).await);

    let raw = client.read_file("asha_budget.json");
    let doc: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["Groceries"], 0.0);
    assert_eq!(doc["Healthcare"], 700.0);
    // Whole amounts are written as integers
    assert!(doc["Healthcare"].is_i64());
    assert!(raw.contains(r#""Healthcare":700"#));
    assert!(!raw.contains("700.0"));

    assert!(!client.set_budget("asha", &[("Education", "-5")]).await);

    let (_, body) = client.get("/notifications").await;
    assert_eq!(body.matches("Budget goals updated").count(), 2);
}

/// Savings below the goal list overspent categories largest first.
#[tokio::test]
async fn test_below_goal_suggestions() {
    let client = TestClient::new();
    assert!(client.create_profile("asha", "10000").await);
    assert!(
        client
            .set_budget(
                "asha",
                &[("Groceries", "1000"), ("Eating_Out", "500"), ("Utilities", "2000")]
            )
            .await
    );
    let now = chrono::Local::now();
    assert!(
        client
            .add_expenses(
                "asha",
                &now.month().to_string(),
                &now.year().to_string(),
                &[("Groceries", "3000"), ("Eating_Out", "4500"), ("Utilities", "1000")]
            )
            .await
    );

    let (_, body) = client.get("/users/asha/budget").await;
    let eating_out = body.find("Reduce Eating Out spending by \u{20b9}4,000.00").unwrap();
    let groceries = body.find("Reduce Groceries spending by \u{20b9}2,000.00").unwrap();
    assert!(eating_out < groceries);
    assert!(!body.contains("Reduce Utilities"));
}
