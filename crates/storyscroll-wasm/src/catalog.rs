#![forbid(unsafe_code)]

//! Built-in demo content: the four service panels from the agency site.

use storyscroll_core::{Panel, StoryConfig};

/// The demo service panels in display order.
#[must_use]
pub fn demo_panels() -> Vec<Panel> {
    vec![
        Panel::new(
            "Custom Websites",
            "High-performance websites and web apps built for speed, SEO, and conversion, \
             tailored to your offer, not a template.",
        )
        .bullet("Landing pages and full sites")
        .bullet("Performance and SEO foundations")
        .bullet("Conversion-first structure"),
        Panel::new(
            "CRM Workflows",
            "CRM setup and automations that capture leads, route them correctly, and keep \
             follow-up consistent.",
        )
        .bullet("Pipelines and lifecycle stages")
        .bullet("Email/SMS automations")
        .bullet("Lead routing and tagging")
        .image("/crm%20img.png"),
        Panel::new(
            "Backend Systems",
            "APIs, integrations, and backend logic that keep operations smooth, with reporting \
             that turns data into decisions.",
        )
        .bullet("Databases, APIs, and data pipelines")
        .bullet("Third-party integrations")
        .bullet("Dashboards and reporting views"),
        Panel::new(
            "Custom App Solutions",
            "Purpose-built apps that streamline workflows, eliminate manual work, and scale with \
             your team.",
        )
        .bullet("Internal tools and admin portals")
        .bullet("Workflow automation and approvals")
        .bullet("Role-based access and auditing")
        .image("/image.png"),
    ]
}

/// Default config carrying the demo panels.
#[must_use]
pub fn demo_story() -> StoryConfig {
    StoryConfig {
        panels: demo_panels(),
        ..StoryConfig::default()
    }
}
