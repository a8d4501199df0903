//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Test Run Reporter",
        version = "0.1.0",
        description = "Records projects, launches, test runs, suites and test executions, and reports their status"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::status,
        api::health::ready,
        api::health::initial_setup,
        // Projects
        api::projects::create_project,
        api::projects::list_projects,
        api::projects::get_project,
        // Launches
        api::launches::create_launch,
        api::launches::finish_launch,
        api::launches::get_launch,
        api::launches::get_launches_by_project,
        // Test runs
        api::test_runs::create_test_run,
        api::test_runs::update_test_run,
        api::test_runs::get_test_run,
        api::test_runs::get_test_runs_by_launch,
        // Test suites
        api::test_suites::create_test_suite,
        api::test_suites::get_test_suite,
        api::test_suites::create_test_suite_history,
        api::test_suites::update_test_suite_history,
        api::test_suites::get_suite_histories_by_test_run,
        api::test_suites::get_suite_histories_by_status_and_test_run,
        // Tests
        api::test_histories::create_test,
        api::test_histories::get_test,
        api::test_histories::create_test_history,
        api::test_histories::update_test_history,
        api::test_histories::update_test_history_resolution,
        api::test_histories::get_test_run_breakdown,
        api::test_histories::get_test_histories_by_status_and_test_run,
        api::test_histories::get_test_histories_by_status,
        api::test_histories::get_test_histories_by_resolution,
        api::test_histories::get_test_histories_by_suite,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::MessageResponse,
            models::IdResponse,
            models::StatusTally,
            models::CalendarDelta,
            models::StatusRef,
            // Health
            api::health::ReadyResponse,
            // Projects
            api::projects::CreateProjectRequest,
            api::projects::ProjectResponse,
            // Launches
            api::launches::CreateLaunchRequest,
            api::launches::FinishLaunchRequest,
            api::launches::LaunchResponse,
            api::launches::TestRunStats,
            api::launches::ProjectLaunchResponse,
            // Test runs
            api::test_runs::CreateTestRunRequest,
            api::test_runs::UpdateTestRunRequest,
            api::test_runs::TestRunResponse,
            api::test_runs::LaunchTestRunResponse,
            // Test suites
            api::test_suites::CreateTestSuiteRequest,
            api::test_suites::CreateTestSuiteResponse,
            api::test_suites::CreateTestSuiteHistoryRequest,
            api::test_suites::CreateTestSuiteHistoryResponse,
            api::test_suites::UpdateTestSuiteHistoryRequest,
            api::test_suites::TestSuiteResponse,
            api::test_suites::TestSuiteHistoryResponse,
            // Tests
            api::test_histories::CreateTestRequest,
            api::test_histories::CreateTestResponse,
            api::test_histories::TestResponse,
            api::test_histories::CreateTestHistoryRequest,
            api::test_histories::CreateTestHistoryResponse,
            api::test_histories::UpdateTestHistoryRequest,
            api::test_histories::UpdateResolutionRequest,
            api::test_histories::TestHistoryResponse,
            api::test_histories::TestHistoryDetailResponse,
            api::test_histories::SuiteTestHistoryResponse,
            api::test_histories::BreakdownTestResponse,
            api::test_histories::BreakdownSuiteResponse,
            api::test_histories::BreakdownResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness, readiness and setup endpoints"),
        (name = "Projects", description = "Project registration and lookup"),
        (name = "Launches", description = "Launch lifecycle and per-run statistics"),
        (name = "Test Runs", description = "Test run lifecycle and statistics"),
        (name = "Test Suites", description = "Test suites and their executions within runs"),
        (name = "Tests", description = "Tests, test executions and run breakdowns")
    )
)]
pub struct ApiDoc;
