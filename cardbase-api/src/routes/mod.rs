/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: GitHub OAuth login flow and current-user endpoint
/// - `projects`: Project CRUD, search, reclassification, and aggregation
/// - `cards`: Card CRUD with AI tag enrichment
/// - `documents`: Document CRUD with AI report generation

pub mod auth;
pub mod cards;
pub mod documents;
pub mod health;
pub mod projects;
