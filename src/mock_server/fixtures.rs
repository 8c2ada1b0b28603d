//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic forum data.

use serde_json::{json, Value};

use crate::mock_server::state::MockState;
use crate::{ApiResource, Relationship};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// Default test scenario with a small, consistent forum.
pub struct DefaultScenario {
    pub resources: Vec<ApiResource>,
    /// `(identification, password, user id)` triples.
    pub credentials: Vec<(String, String, String)>,
}

impl DefaultScenario {
    /// Load the scenario into a fresh [`MockState`].
    pub fn into_state(self) -> MockState {
        let mut state = MockState::new();

        for resource in self.resources {
            state.insert(resource);
        }

        for (identification, password, user_id) in &self.credentials {
            state = state.with_credentials(identification, password, user_id);
        }

        state
    }
}

fn resource(value: Value) -> ApiResource {
    serde_json::from_value(value).expect("fixture must be a valid resource")
}

impl Fixtures {
    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// Create a user with a username and optional display name.
    pub fn user(id: &str, username: &str, display_name: Option<&str>) -> ApiResource {
        resource(json!({
            "type": "users",
            "id": id,
            "attributes": {
                "username": username,
                "displayName": display_name,
                "avatarUrl": null,
                "joinTime": "2024-01-01T00:00:00+00:00",
                "discussionCount": 0,
                "commentCount": 0,
                "canEdit": false,
                "canDelete": false
            },
            "relationships": {"groups": {"data": []}}
        }))
    }

    // =========================================================================
    // Tag Fixtures
    // =========================================================================

    /// Create a top-level tag.
    pub fn tag(id: &str, name: &str) -> ApiResource {
        resource(json!({
            "type": "tags",
            "id": id,
            "attributes": {
                "name": name,
                "slug": name.to_lowercase(),
                "description": null,
                "color": "#4e89e8",
                "discussionCount": 1,
                "isChild": false,
                "isHidden": false
            },
            "relationships": {"parent": {"data": null}}
        }))
    }

    // =========================================================================
    // Discussion Fixtures
    // =========================================================================

    /// Create a minimal discussion without relationships.
    pub fn minimal_discussion(id: &str, title: &str) -> ApiResource {
        resource(json!({
            "type": "discussions",
            "id": id,
            "attributes": {
                "title": title,
                "slug": format!("{id}-{}", title.to_lowercase().replace(' ', "-")),
                "commentCount": 0,
                "participantCount": 0,
                "createdAt": "2024-01-02T12:00:00+00:00",
                "canReply": true,
                "canRename": true,
                "canDelete": true,
                "isLocked": false,
                "isSticky": false
            }
        }))
    }

    /// Create a discussion started by `user_id` with the given tags.
    pub fn discussion(id: &str, title: &str, user_id: &str, tag_ids: &[&str]) -> ApiResource {
        let mut discussion = Self::minimal_discussion(id, title);
        discussion
            .relationships
            .insert("user".to_string(), Relationship::to_one("users", user_id));
        discussion.relationships.insert(
            "tags".to_string(),
            Relationship::to_many("tags", tag_ids.iter().copied()),
        );
        discussion
    }

    // =========================================================================
    // Post Fixtures
    // =========================================================================

    /// Create a comment post.
    pub fn post(
        id: &str,
        discussion_id: &str,
        number: u64,
        user_id: &str,
        content: &str,
    ) -> ApiResource {
        resource(json!({
            "type": "posts",
            "id": id,
            "attributes": {
                "number": number,
                "content": content,
                "contentHtml": format!("<p>{content}</p>"),
                "createdAt": "2024-01-02T12:00:00+00:00",
                "editedAt": null,
                "canEdit": true,
                "canDelete": true,
                "canHide": true,
                "isHidden": false
            },
            "relationships": {
                "discussion": {"data": {"type": "discussions", "id": discussion_id}},
                "user": {"data": {"type": "users", "id": user_id}}
            }
        }))
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// A forum with two users, two tags, two discussions and three posts.
    ///
    /// Discussion 1 ("Welcome") has posts 1 and 2, discussion 2 ("Help
    /// needed") has post 3. `admin` / `password` logs in as user 1.
    pub fn default_scenario() -> DefaultScenario {
        let mut admin = Self::user("1", "admin", Some("Administrator"));
        admin.relationships.insert(
            "groups".to_string(),
            Relationship::to_many("groups", ["1"]),
        );

        DefaultScenario {
            resources: vec![
                admin,
                Self::user("2", "jdoe", None),
                Self::tag("1", "General"),
                Self::tag("2", "Support"),
                Self::discussion("1", "Welcome", "1", &["1"]),
                Self::discussion("2", "Help needed", "2", &["2"]),
                Self::post("1", "1", 1, "1", "Welcome to the forum!"),
                Self::post("2", "1", 2, "2", "Thanks for having me."),
                Self::post("3", "2", 1, "2", "How do I reset my password?"),
            ],
            credentials: vec![(
                "admin".to_string(),
                "password".to_string(),
                "1".to_string(),
            )],
        }
    }
}
