//! Remote-facing services: the REST client, the GraphQL listing path and
//! git-based instance discovery.

pub mod git_remote;
pub mod gitlab_client;
pub mod graphql;
