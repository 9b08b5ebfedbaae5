//! domainstack — normalize semi-structured domain/provider configuration
//! into canonical service trees.
//!
//! Configuration files describe internet domains and the providers they
//! depend on (hosting, DNS, registrar, CDN, repository, …) as arbitrarily
//! nested YAML. The normalization engine resolves loose provider references
//! — a bare URL, a slug, or an explicit name+URL pair — against a static
//! provider directory and produces consistent [`Service`](types::Service)
//! trees.
//!
//! # Quick start
//!
//! ```
//! use domainstack::parsers::DocumentParser;
//! use domainstack::services::ProviderDirectory;
//!
//! let directory = ProviderDirectory::bundled();
//! let document = DocumentParser::new(&directory)
//!     .parse_str("example.com:\n  registrar: namecheap\n")?;
//!
//! let registrar = &document.domain("example.com").unwrap().services("registrar").unwrap()[0];
//! assert_eq!(registrar.name, "Namecheap");
//! # Ok::<(), domainstack::types::DomainstackError>(())
//! ```

pub mod cli;
pub mod parsers;
pub mod services;
pub mod types;

pub use services::normalizer::normalize;
pub use services::ProviderDirectory;
pub use types::Service;
