// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup
// - infrastructure: DB, job queue and outbound HTTP adapters
// - presentation: GraphQL schema and HTTP routing
// - application: access policy, ports and use cases
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
