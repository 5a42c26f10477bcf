use std::collections::BTreeMap;

use anyhow::{Context, Result};
use metamodel::v1::{Document, GraphBuilder, ResourceIdentity};
use serde::Serialize;

use crate::input::{read_document, to_json};

/// Shape of a built graph.
#[derive(Debug, Serialize)]
struct Summary {
    root: ResourceIdentity,
    /// Distinct resources after deduplication
    resources: usize,
    /// Resources listed in the input (`data` plus `included`)
    listed: usize,
    /// Relationship references across all nodes
    references: usize,
    types: BTreeMap<String, usize>,
}

pub fn run(input: String, max_resources: Option<usize>, pretty: bool) -> Result<()> {
    let doc = read_document(&input)?;
    let summary = summarize(&doc, max_resources)
        .with_context(|| format!("Failed to build resource graph from {:?}", input))?;
    println!("{}", to_json(&summary, pretty)?);
    Ok(())
}

fn summarize(doc: &Document, max_resources: Option<usize>) -> metamodel::v1::Result<Summary> {
    let mut builder = GraphBuilder::new();
    if let Some(limit) = max_resources {
        builder = builder.max_resources(limit);
    }
    let (graph, root) = builder.build(doc)?;

    let mut types = BTreeMap::new();
    let mut references = 0;
    for (_, node) in graph.nodes() {
        *types.entry(node.resource_type().to_string()).or_insert(0) += 1;
        references += node
            .relationships()
            .iter()
            .map(|rel| rel.slot.targets().len())
            .sum::<usize>();
    }

    Ok(Summary {
        root: graph.node(root).identity().clone(),
        resources: graph.len(),
        listed: 1 + doc.included.len(),
        references,
        types,
    })
}
