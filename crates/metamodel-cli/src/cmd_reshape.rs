use anyhow::{Context, Result, bail};
use clap::Args;
use metamodel::v1::{
    Document, GraphBuilder, InclusionTree, Projector, RenderOptions, TypeNaming, render,
};

use crate::input::{read_document, to_json};

#[derive(Args, Debug)]
pub struct ReshapeArgs {
    /// Input file (use - for stdin)
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Relationship paths to include, e.g. "author,comments.author"
    #[arg(long, default_value = "")]
    pub include: String,

    /// Sparse fieldset for one type, e.g. "post=title,author" (repeatable)
    #[arg(long = "fields", value_name = "TYPE=FIELDS")]
    pub fields: Vec<String>,

    /// Emit plural resource types (post -> posts)
    #[arg(long)]
    pub plural: bool,

    /// Stop after this many included resources
    #[arg(long)]
    pub max_included: Option<usize>,

    /// Refuse documents that materialize more resources than this
    #[arg(long)]
    pub max_resources: Option<usize>,
}

pub fn run(args: ReshapeArgs, pretty: bool) -> Result<()> {
    let doc = read_document(&args.input)?;
    let out = reshape(&doc, &args)?;
    tracing::debug!(
        input = %args.input,
        included = out.included.len(),
        "rendered document"
    );
    println!("{}", to_json(&out, pretty)?);
    Ok(())
}

fn reshape(doc: &Document, args: &ReshapeArgs) -> Result<Document> {
    let mut builder = GraphBuilder::new();
    if let Some(limit) = args.max_resources {
        builder = builder.max_resources(limit);
    }
    let (graph, root) = builder
        .build(doc)
        .with_context(|| format!("Failed to build resource graph from {:?}", args.input))?;

    let mut options = RenderOptions::new().with_include(InclusionTree::from_paths(&args.include));
    for spec in &args.fields {
        let (resource_type, fields) = parse_fieldset(spec)?;
        options = options.with_fields(resource_type, fields);
    }
    if args.plural {
        options = options.with_naming(TypeNaming::Plural);
    }
    if let Some(limit) = args.max_included {
        options = options.with_max_included(limit);
    }

    let mut out = render(&Projector::new(&graph), root, &options);
    out.meta = doc.meta.clone();
    out.links = doc.links.clone();
    Ok(out)
}

/// Split `type=a,b` into the type and its field names. An empty list after
/// `=` hides every field of that type.
fn parse_fieldset(spec: &str) -> Result<(&str, Vec<&str>)> {
    let Some((resource_type, fields)) = spec.split_once('=') else {
        bail!("Invalid fieldset {:?}: expected TYPE=FIELD[,FIELD...]", spec);
    };
    let resource_type = resource_type.trim();
    if resource_type.is_empty() {
        bail!("Invalid fieldset {:?}: missing resource type", spec);
    }
    let fields = fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    Ok((resource_type, fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn make_doc() -> Document {
        serde_json::from_value(json!({
            "data": {
                "type": "post", "id": "1",
                "attributes": {"title": "Hi", "body": "Hello"},
                "relationships": {
                    "author": {"data": {"type": "user", "id": "9"}},
                    "comments": {"data": [{"type": "comment", "id": "c1"}]}
                }
            },
            "included": [
                {"type": "user", "id": "9", "attributes": {"name": "Ann"}},
                {"type": "comment", "id": "c1", "attributes": {"text": "Nice"},
                 "relationships": {"author": {"data": {"type": "user", "id": "9"}}}}
            ],
            "meta": {"generated": true}
        }))
        .unwrap()
    }

    fn args(include: &str) -> ReshapeArgs {
        ReshapeArgs {
            input: "-".to_string(),
            include: include.to_string(),
            fields: Vec::new(),
            plural: false,
            max_included: None,
            max_resources: None,
        }
    }

    #[test]
    fn test_parse_fieldset() {
        assert_eq!(
            parse_fieldset("post=title, body").unwrap(),
            ("post", vec!["title", "body"])
        );
        assert_eq!(parse_fieldset("user=").unwrap(), ("user", vec![]));
        assert!(parse_fieldset("post").is_err());
        assert!(parse_fieldset("=title").is_err());
    }

    #[test]
    fn test_reshape_default_has_no_included() {
        let out = reshape(&make_doc(), &args("")).unwrap();
        assert!(out.included.is_empty());
        assert_eq!(out.data.relationships.len(), 2);
        assert_eq!(out.meta, Some(json!({"generated": true})));
    }

    #[test]
    fn test_reshape_with_include_and_fields() {
        let mut a = args("comments.author");
        a.fields = vec!["post=title,comments".to_string(), "user=".to_string()];
        a.plural = true;
        let out = reshape(&make_doc(), &a).unwrap();

        assert_eq!(out.data.resource_type, "posts");
        assert_eq!(out.data.attributes.len(), 1);
        assert!(out.data.relationships.contains_key("comments"));
        assert!(!out.data.relationships.contains_key("author"));

        let types: Vec<&str> = out.included.iter().map(|r| r.resource_type.as_str()).collect();
        assert_eq!(types, vec!["comments", "users"]);
        assert!(out.included[1].attributes.is_empty());
    }

    #[test]
    fn test_reshape_max_included() {
        let mut a = args("author,comments");
        a.max_included = Some(1);
        let out = reshape(&make_doc(), &a).unwrap();
        assert_eq!(out.included.len(), 1);
    }

    #[test]
    fn test_reshape_max_resources() {
        let mut a = args("");
        a.max_resources = Some(2);
        let err = reshape(&make_doc(), &a).unwrap_err();
        assert!(err.to_string().contains("Failed to build resource graph"));
    }

    #[test]
    fn test_reshape_malformed_linkage() {
        let doc: Document = serde_json::from_value(json!({
            "data": {"type": "post", "id": "1",
                     "relationships": {"author": {"data": {"type": "user"}}}}
        }))
        .unwrap();
        let err = reshape(&doc, &args("")).unwrap_err();
        assert!(format!("{:#}", err).contains("Malformed linkage in relationship 'author'"));
    }

    #[test]
    fn test_run_with_temp_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{}", make_doc().to_json().unwrap()).unwrap();
        f.flush().unwrap();

        let mut a = args("author");
        a.input = f.path().to_str().unwrap().to_string();
        assert!(run(a, true).is_ok());
    }

    #[test]
    fn test_run_nonexistent_file() {
        let mut a = args("");
        a.input = "/nonexistent/file.json".to_string();
        assert!(run(a, false).is_err());
    }
}
