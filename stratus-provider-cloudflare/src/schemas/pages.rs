//! Pages project schema definition

use stratus_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::types::{compatibility_date, source_type};

fn build_config_block() -> AttributeType {
    AttributeType::Block(vec![
        AttributeSchema::new("build_command", AttributeType::String)
            .with_description("Command used to build project"),
        AttributeSchema::new("destination_dir", AttributeType::String)
            .with_description("Output directory of the build"),
        AttributeSchema::new("root_dir", AttributeType::String)
            .with_description("Directory to run the command"),
        AttributeSchema::new("web_analytics_tag", AttributeType::String)
            .with_description("The classifying tag for analytics"),
        AttributeSchema::new("web_analytics_token", AttributeType::String)
            .with_description("The auth token for analytics"),
    ])
}

fn source_block() -> AttributeType {
    let config = AttributeType::Block(vec![
        AttributeSchema::new("owner", AttributeType::String)
            .with_description("Project owner username"),
        AttributeSchema::new("repo_name", AttributeType::String)
            .with_description("Project repository name"),
        AttributeSchema::new("production_branch", AttributeType::String)
            .with_description("Project production branch name"),
        AttributeSchema::new("pr_comments_enabled", AttributeType::Bool)
            .with_description("Enable Pages to comment on Pull Requests"),
        AttributeSchema::new("deployments_enabled", AttributeType::Bool)
            .with_description("Toggle deployments on this repo"),
    ]);
    AttributeType::Block(vec![
        AttributeSchema::new("type", source_type())
            .with_description("Project host type"),
        AttributeSchema::new("config", config)
            .with_description("Configuration for the source of the Cloudflare Pages project"),
    ])
}

fn deployment_config_block() -> AttributeType {
    AttributeType::Block(vec![
        AttributeSchema::new("environment_variables", types::string_map())
            .with_description("Environment variables for build configs"),
        AttributeSchema::new("compatibility_date", compatibility_date())
            .with_description("Compatibility date used for Pages Functions"),
        AttributeSchema::new("compatibility_flags", types::string_list())
            .with_description("Compatibility flags used for Pages Functions"),
    ])
}

/// Returns the schema for Pages projects
pub fn project_schema() -> ResourceSchema {
    ResourceSchema::new("pages_project")
        .with_description("A Cloudflare Pages project")
        .attribute(
            AttributeSchema::new("account_id", AttributeType::String)
                .required()
                .with_description("The account identifier to target for the resource"),
        )
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .required()
                .with_description("Name of the project"),
        )
        .attribute(
            AttributeSchema::new("production_branch", AttributeType::String)
                .with_description("The name of the branch that is used for the production environment"),
        )
        .attribute(
            AttributeSchema::new("build_config", build_config_block())
                .with_description("Configuration for the project build process"),
        )
        .attribute(
            AttributeSchema::new("source", source_block())
                .with_description("Configuration for the project source"),
        )
        .attribute(
            AttributeSchema::new(
                "deployment_configs",
                AttributeType::Block(vec![
                    AttributeSchema::new("preview", deployment_config_block())
                        .with_description("Configuration for preview deploys"),
                    AttributeSchema::new("production", deployment_config_block())
                        .with_description("Configuration for production deploys"),
                ]),
            )
            .with_description("Configuration for deployments in a project"),
        )
        .attribute(
            AttributeSchema::new("project_id", AttributeType::String)
                .computed()
                .with_description("Identifier assigned to the project by the remote service"),
        )
        .attribute(
            AttributeSchema::new("subdomain", AttributeType::String)
                .computed()
                .with_description("The Cloudflare subdomain associated with the project"),
        )
        .attribute(
            AttributeSchema::new("domains", types::string_list())
                .computed()
                .with_description("A list of associated custom domains for the project"),
        )
        .attribute(
            AttributeSchema::new("created_on", AttributeType::String)
                .computed()
                .with_description("When the project was created"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_core::resource::{Attributes, Value};

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn minimal() -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("account_id".to_string(), Value::from("acct123"));
        attrs.insert("name".to_string(), Value::from("site"));
        attrs
    }

    #[test]
    fn minimal_project() {
        assert!(project_schema().validate(&minimal()).is_ok());
    }

    #[test]
    fn full_project() {
        let mut attrs = minimal();
        attrs.insert("production_branch".to_string(), Value::from("main"));
        attrs.insert(
            "source".to_string(),
            map(&[
                ("type", Value::from("github")),
                (
                    "config",
                    map(&[
                        ("owner", Value::from("octo")),
                        ("repo_name", Value::from("site")),
                        ("pr_comments_enabled", Value::Bool(true)),
                    ]),
                ),
            ]),
        );
        attrs.insert(
            "deployment_configs".to_string(),
            map(&[(
                "production",
                map(&[
                    (
                        "environment_variables",
                        map(&[("API_URL", Value::from("https://api.example"))]),
                    ),
                    ("compatibility_date", Value::from("2024-03-21")),
                    (
                        "compatibility_flags",
                        Value::List(vec![Value::from("nodejs_compat")]),
                    ),
                ]),
            )]),
        );
        assert!(project_schema().validate(&attrs).is_ok());
    }

    #[test]
    fn invalid_source_type() {
        let mut attrs = minimal();
        attrs.insert(
            "source".to_string(),
            map(&[("type", Value::from("bitbucket"))]),
        );
        assert!(project_schema().validate(&attrs).is_err());
    }

    #[test]
    fn invalid_compatibility_date() {
        let mut attrs = minimal();
        attrs.insert(
            "deployment_configs".to_string(),
            map(&[(
                "preview",
                map(&[("compatibility_date", Value::from("21/03/2024"))]),
            )]),
        );
        assert!(project_schema().validate(&attrs).is_err());
    }

    #[test]
    fn computed_fields_rejected() {
        let mut attrs = minimal();
        attrs.insert("subdomain".to_string(), Value::from("site.pages.dev"));
        assert!(project_schema().validate(&attrs).is_err());
    }
}
