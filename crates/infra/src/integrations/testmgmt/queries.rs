//! GraphQL documents sent to the remote API

use casesync_domain::LinkCategory;

/// Documents and response field names for one link category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryDocuments {
    pub add: &'static str,
    pub add_field: &'static str,
    pub remove: &'static str,
    pub remove_field: &'static str,
    pub list: &'static str,
    pub list_field: &'static str,
}

pub fn category_documents(category: LinkCategory) -> CategoryDocuments {
    match category {
        LinkCategory::TestPlans => CategoryDocuments {
            add: ADD_TESTS_TO_TEST_PLAN,
            add_field: "addTestsToTestPlan",
            remove: REMOVE_TESTS_FROM_TEST_PLAN,
            remove_field: "removeTestsFromTestPlan",
            list: LIST_TEST_PLANS,
            list_field: "getTestPlans",
        },
        LinkCategory::TestExecutions => CategoryDocuments {
            add: ADD_TESTS_TO_TEST_EXECUTION,
            add_field: "addTestsToTestExecution",
            remove: REMOVE_TESTS_FROM_TEST_EXECUTION,
            remove_field: "removeTestsFromTestExecution",
            list: LIST_TEST_EXECUTIONS,
            list_field: "getTestExecutions",
        },
        LinkCategory::TestSets => CategoryDocuments {
            add: ADD_TESTS_TO_TEST_SET,
            add_field: "addTestsToTestSet",
            remove: REMOVE_TESTS_FROM_TEST_SET,
            remove_field: "removeTestsFromTestSet",
            list: LIST_TEST_SETS,
            list_field: "getTestSets",
        },
        LinkCategory::Preconditions => CategoryDocuments {
            add: ADD_PRECONDITIONS_TO_TEST,
            add_field: "addPreconditionsToTest",
            remove: REMOVE_PRECONDITIONS_FROM_TEST,
            remove_field: "removePreconditionsFromTest",
            list: LIST_PRECONDITIONS,
            list_field: "getPreconditions",
        },
    }
}

// Container categories: the container is the subject, the test is the member.

pub const ADD_TESTS_TO_TEST_PLAN: &str = r#"
    mutation AddTestsToTestPlan($issueId: String!, $testIssueIds: [String]!) {
        addTestsToTestPlan(issueId: $issueId, testIssueIds: $testIssueIds) {
            addedTests
            warning
        }
    }
"#;

pub const REMOVE_TESTS_FROM_TEST_PLAN: &str = r#"
    mutation RemoveTestsFromTestPlan($issueId: String!, $testIssueIds: [String]!) {
        removeTestsFromTestPlan(issueId: $issueId, testIssueIds: $testIssueIds) {
            removedTests
            warning
        }
    }
"#;

pub const ADD_TESTS_TO_TEST_EXECUTION: &str = r#"
    mutation AddTestsToTestExecution($issueId: String!, $testIssueIds: [String]!) {
        addTestsToTestExecution(issueId: $issueId, testIssueIds: $testIssueIds) {
            addedTests
            warning
        }
    }
"#;

pub const REMOVE_TESTS_FROM_TEST_EXECUTION: &str = r#"
    mutation RemoveTestsFromTestExecution($issueId: String!, $testIssueIds: [String]!) {
        removeTestsFromTestExecution(issueId: $issueId, testIssueIds: $testIssueIds) {
            removedTests
            warning
        }
    }
"#;

pub const ADD_TESTS_TO_TEST_SET: &str = r#"
    mutation AddTestsToTestSet($issueId: String!, $testIssueIds: [String]!) {
        addTestsToTestSet(issueId: $issueId, testIssueIds: $testIssueIds) {
            addedTests
            warning
        }
    }
"#;

pub const REMOVE_TESTS_FROM_TEST_SET: &str = r#"
    mutation RemoveTestsFromTestSet($issueId: String!, $testIssueIds: [String]!) {
        removeTestsFromTestSet(issueId: $issueId, testIssueIds: $testIssueIds) {
            removedTests
            warning
        }
    }
"#;

// Preconditions invert the relationship: the test is the subject.

pub const ADD_PRECONDITIONS_TO_TEST: &str = r#"
    mutation AddPreconditionsToTest($issueId: String!, $preconditionIssueIds: [String]!) {
        addPreconditionsToTest(issueId: $issueId, preconditionIssueIds: $preconditionIssueIds) {
            addedPreconditions
            warning
        }
    }
"#;

pub const REMOVE_PRECONDITIONS_FROM_TEST: &str = r#"
    mutation RemovePreconditionsFromTest($issueId: String!, $preconditionIssueIds: [String]!) {
        removePreconditionsFromTest(issueId: $issueId, preconditionIssueIds: $preconditionIssueIds) {
            removedPreconditions
            warning
        }
    }
"#;

pub const ADD_TESTS_TO_FOLDER: &str = r#"
    mutation AddTestsToFolder($projectId: String!, $path: String!, $testIssueIds: [String]!) {
        addTestsToFolder(projectId: $projectId, path: $path, testIssueIds: $testIssueIds) {
            folder {
                name
                path
                testsCount
            }
            warnings
        }
    }
"#;

pub const REMOVE_TESTS_FROM_FOLDER: &str = r#"
    mutation RemoveTestsFromFolder($projectId: String!, $path: String!, $testIssueIds: [String]!) {
        removeTestsFromFolder(projectId: $projectId, path: $path, testIssueIds: $testIssueIds) {
            folder {
                name
                path
                testsCount
            }
            warnings
        }
    }
"#;

pub const GET_PROJECT_SETTINGS: &str = r#"
    query GetProjectSettings($projectIdOrKey: String!) {
        getProjectSettings(projectIdOrKey: $projectIdOrKey) {
            projectId
        }
    }
"#;

pub const GET_TEST_LINKS: &str = r#"
    query GetTestLinks($issueId: String!, $limit: Int!) {
        getTest(issueId: $issueId) {
            issueId
            projectId
            folder {
                path
            }
            testPlans(limit: $limit) {
                results { issueId }
            }
            testExecutions(limit: $limit) {
                results { issueId }
            }
            testSets(limit: $limit) {
                results { issueId }
            }
            preconditions(limit: $limit) {
                results { issueId }
            }
        }
    }
"#;

pub const LIST_TEST_PLANS: &str = r#"
    query ListTestPlans($jql: String!, $limit: Int!) {
        getTestPlans(jql: $jql, limit: $limit) {
            results {
                issueId
                jira(fields: ["key", "summary"])
            }
        }
    }
"#;

pub const LIST_TEST_EXECUTIONS: &str = r#"
    query ListTestExecutions($jql: String!, $limit: Int!) {
        getTestExecutions(jql: $jql, limit: $limit) {
            results {
                issueId
                jira(fields: ["key", "summary"])
            }
        }
    }
"#;

pub const LIST_TEST_SETS: &str = r#"
    query ListTestSets($jql: String!, $limit: Int!) {
        getTestSets(jql: $jql, limit: $limit) {
            results {
                issueId
                jira(fields: ["key", "summary"])
            }
        }
    }
"#;

pub const LIST_PRECONDITIONS: &str = r#"
    query ListPreconditions($jql: String!, $limit: Int!) {
        getPreconditions(jql: $jql, limit: $limit) {
            results {
                issueId
                jira(fields: ["key", "summary"])
            }
        }
    }
"#;
