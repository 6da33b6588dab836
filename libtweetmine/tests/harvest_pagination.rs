//! Pagination controller behavior against a mock timeline.

use libtweetmine::budget::RateBudget;
use libtweetmine::error::FetchError;
use libtweetmine::harvest::harvest_timeline;
use libtweetmine::source::mock::MockTimeline;
use libtweetmine::source::ContentMode;
use libtweetmine::types::Account;
use std::sync::Arc;

fn alice() -> Account {
    Account::new("alice")
}

#[tokio::test]
async fn small_request_is_a_single_page() {
    let mock = MockTimeline::with_generated(500, 100_000);
    let budget = RateBudget::new();

    let result = harvest_timeline(&mock, &budget, &alice(), 50, ContentMode::Normal).await;

    assert_eq!(mock.call_count(), 1);
    assert_eq!(result.records.len(), 50);
    let calls = mock.calls();
    assert_eq!(calls[0].page_size, 50);
    assert_eq!(calls[0].max_id, None);
    assert_eq!(budget.total(), 1);
}

#[tokio::test]
async fn result_is_capped_by_available_items() {
    let mock = MockTimeline::with_generated(7, 100);
    let budget = RateBudget::new();

    let result = harvest_timeline(&mock, &budget, &alice(), 50, ContentMode::Normal).await;

    assert_eq!(mock.call_count(), 1);
    assert_eq!(result.records.len(), 7);
}

#[tokio::test]
async fn large_request_pages_with_decremented_cursors() {
    let mock = MockTimeline::with_generated(1000, 100_000);
    let budget = RateBudget::new();

    let result = harvest_timeline(&mock, &budget, &alice(), 450, ContentMode::Normal).await;

    // ceil(450 / 200) = 3 pages of 200, 200, 50.
    let calls = mock.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].page_size, 200);
    assert_eq!(calls[1].page_size, 200);
    assert_eq!(calls[2].page_size, 50);

    // Each cursor starts strictly before the previous page's oldest item.
    assert_eq!(calls[0].max_id, None);
    assert_eq!(calls[1].max_id, Some(100_000 - 200));
    assert_eq!(calls[2].max_id, Some(100_000 - 400));

    assert_eq!(result.records.len(), 450);
    assert_eq!(budget.total(), 3);
}

#[tokio::test]
async fn quota_loop_keeps_fetching_after_a_short_page() {
    // Only 120 posts exist but 250 were requested: the loop spends its full
    // two-page quota, and the second page comes back empty.
    let mock = MockTimeline::with_generated(120, 5_000);
    let budget = RateBudget::new();

    let result = harvest_timeline(&mock, &budget, &alice(), 250, ContentMode::Normal).await;

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].max_id, Some(5_000 - 120));
    assert_eq!(result.records.len(), 120);
    assert_eq!(budget.total(), 2);
}

#[tokio::test]
async fn transport_error_mid_harvest_keeps_surrounding_pages() {
    let mock = MockTimeline::with_generated(1000, 100_000)
        .fail_on_call(1, FetchError::Transport("connection reset".to_string()));
    let budget = RateBudget::new();

    let result = harvest_timeline(&mock, &budget, &alice(), 600, ContentMode::Normal).await;

    let calls = mock.calls();
    assert_eq!(calls.len(), 3);

    // Page 3 resumes from page 1's oldest item: the failed page consumed
    // quota but did not move the cursor.
    assert_eq!(calls[2].max_id, Some(100_000 - 200));

    // Pages 1 and 3 both landed; page 2's 200 items are missing.
    assert_eq!(result.records.len(), 400);
    let ids: Vec<i64> = result.records.iter().map(|r| r.id).collect();
    assert!(ids.windows(2).all(|pair| pair[0] > pair[1]));
}

#[tokio::test]
async fn empty_response_is_recovered_like_transport_failure() {
    let mock =
        MockTimeline::with_generated(1000, 100_000).fail_on_call(0, FetchError::EmptyResponse);
    let budget = RateBudget::new();

    let result = harvest_timeline(&mock, &budget, &alice(), 400, ContentMode::Normal).await;

    // First page lost, second page starts from the top (no cursor yet).
    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].max_id, None);
    assert_eq!(result.records.len(), 200);
}

#[tokio::test]
async fn record_ids_strictly_decrease() {
    let mock = MockTimeline::with_generated(600, 42_000);
    let budget = RateBudget::new();

    let result = harvest_timeline(&mock, &budget, &alice(), 600, ContentMode::Normal).await;

    let ids: Vec<i64> = result.records.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 600);
    assert!(ids.windows(2).all(|pair| pair[0] > pair[1]));
}

#[tokio::test]
async fn text_is_sanitized_on_append() {
    let mut tweets = libtweetmine::source::mock::generate_timeline(1, 10);
    tweets[0].text = "said \u{201C}hi\u{201D}\nand left".to_string();
    let mock = MockTimeline::with_timeline(tweets);
    let budget = RateBudget::new();

    let result = harvest_timeline(&mock, &budget, &alice(), 1, ContentMode::Normal).await;

    assert_eq!(result.records[0].text, "said ~hi~and left");
}

#[tokio::test]
async fn concurrent_accounts_sum_the_shared_budget_exactly() {
    let budget = Arc::new(RateBudget::new());
    let mut tasks = Vec::new();

    // 8 accounts, 450 posts each: 3 pages per account, 24 total.
    for index in 0..8 {
        let budget = Arc::clone(&budget);
        tasks.push(tokio::spawn(async move {
            let mock = MockTimeline::with_generated(1000, 900_000);
            let account = Account::new(format!("account{index}"));
            harvest_timeline(&mock, &budget, &account, 450, ContentMode::Normal).await
        }));
    }

    for task in tasks {
        let result = task.await.unwrap();
        assert_eq!(result.records.len(), 450);
    }
    assert_eq!(budget.total(), 24);
}

#[tokio::test]
async fn extended_mode_is_passed_through_to_the_source() {
    let mut tweets = libtweetmine::source::mock::generate_timeline(4, 40);
    tweets[1].is_reply = true;
    tweets[2].is_retweet = true;
    let mock = MockTimeline::with_timeline(tweets);
    let budget = RateBudget::new();

    let result = harvest_timeline(&mock, &budget, &alice(), 4, ContentMode::Extended).await;

    assert_eq!(mock.calls()[0].mode, ContentMode::Extended);
    assert_eq!(result.records.len(), 4);
}

#[tokio::test]
async fn zero_count_issues_no_fetches() {
    let mock = MockTimeline::with_generated(10, 100);
    let budget = RateBudget::new();

    let result = harvest_timeline(&mock, &budget, &alice(), 0, ContentMode::Normal).await;

    assert_eq!(mock.call_count(), 0);
    assert!(result.records.is_empty());
    assert_eq!(budget.total(), 0);
}
