//! CRD YAML Generator
//!
//! Prints the manifests of every custom resource the builders know about.
//!
//! Usage: cargo run --bin crdgen > deploy/crds/all.yaml

use kube_resource_builders::crd::generate_crds;

fn main() -> anyhow::Result<()> {
    for crd in generate_crds()? {
        println!("---");
        print!("{}", crd);
    }
    Ok(())
}
