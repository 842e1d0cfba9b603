//! Entity catalogue: which REST resource each entity lives under and which
//! fields the browser asks the API to return for it.

use serde::{Deserialize, Serialize};

/// A MiST resource that can be listed with pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
	Genomes,
	GenomesShopCart,
	Genes,
	GenesInsideGenome,
	GenesShopCart,
	/// Genome search used to pick the scope of a gene search.
	Scope,
}

impl Entity {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Genomes => "genomes",
			Self::GenomesShopCart => "genomes_shopcart",
			Self::Genes => "genes",
			Self::GenesInsideGenome => "genes_inside_genome",
			Self::GenesShopCart => "genes_shopcart",
			Self::Scope => "scope",
		}
	}

	/// Raw field selection sent with every list request for this entity.
	pub const fn fields(self) -> &'static str {
		match self {
			Self::Genomes | Self::GenomesShopCart => "id,name,superkingdom,phylum,class,order,family,genus,genbank_version,version,assembly_level",
			Self::Genes | Self::GenesShopCart => "id,stable_id,version,names,locus,location,product&fields.Component=version,definition&fields.Aseq",
			Self::GenesInsideGenome => "id,stable_id,version,names,locus,location,product&fields.Aseq",
			Self::Scope => "id,version,name,assembly_level",
		}
	}

	/// Splits [`Self::fields`] into query pairs.
	///
	/// The head becomes `fields=<head>`; every `&fields.X=Y` tail becomes its own pair and a bare
	/// `&fields.X` carries an empty value.
	pub fn field_params(self) -> Vec<(&'static str, &'static str)> {
		let mut parts = self.fields().split('&');
		let mut params = Vec::new();
		if let Some(head) = parts.next() {
			params.push(("fields", head));
		}
		for tail in parts {
			match tail.split_once('=') {
				Some((key, value)) => params.push((key, value)),
				None => params.push((tail, "")),
			}
		}
		params
	}

	/// Path segments below the API base for this entity, or `None` when the scope it needs is missing.
	pub fn resource_path(self, scope: Option<&str>) -> Option<Vec<String>> {
		match self {
			Self::Genomes | Self::GenomesShopCart | Self::Scope => Some(vec!["genomes".to_string()]),
			Self::Genes | Self::GenesShopCart => Some(vec!["genes".to_string()]),
			Self::GenesInsideGenome => {
				let scope = scope.filter(|scope| !scope.is_empty())?;
				Some(vec!["genomes".to_string(), scope.to_string(), "genes".to_string()])
			}
		}
	}
}
