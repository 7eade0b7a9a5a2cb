use std::str::FromStr;

use crate::error::{Result, WikiError};
use crate::request::{Method, RequestDescriptor, ResponseFormat};

use super::{CallerHeaders, Endpoint};

const CONTENT_TYPE_SPARQL: &str = "application/sparql-query";

/// Result format requested from the query endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SparqlFormat {
    #[default]
    Json,
    Csv,
    Tsv,
}

impl SparqlFormat {
    pub fn accept(&self) -> &'static str {
        match self {
            SparqlFormat::Json => "application/sparql-results+json",
            SparqlFormat::Csv => "text/csv",
            SparqlFormat::Tsv => "text/tab-separated-values",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SparqlFormat::Json => "json",
            SparqlFormat::Csv => "csv",
            SparqlFormat::Tsv => "tsv",
        }
    }
}

impl FromStr for SparqlFormat {
    type Err = WikiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(SparqlFormat::Json),
            "csv" => Ok(SparqlFormat::Csv),
            "tsv" => Ok(SparqlFormat::Tsv),
            _ => Err(WikiError::usage(format!(
                "Unsupported format \"{}\". Use json, csv or tsv.",
                s
            ))),
        }
    }
}

/// `POST {endpoint}` with the query text as body.
#[derive(Debug, Clone)]
pub struct SparqlQuery {
    pub endpoint: String,
    pub query: String,
    pub format: SparqlFormat,
}

impl Endpoint for SparqlQuery {
    fn build(&self, caller: &CallerHeaders) -> Result<RequestDescriptor> {
        if self.query.trim().is_empty() {
            return Err(WikiError::usage(
                "Query input required. Provide --query, --file, or stdin.",
            ));
        }

        let mut headers = caller.base_headers();
        headers.set("content-type", CONTENT_TYPE_SPARQL);
        headers.set("accept", self.format.accept());

        Ok(RequestDescriptor {
            method: Method::Post,
            url: self.endpoint.clone(),
            headers,
            body: Some(self.query.clone()),
        })
    }

    fn response_format(&self) -> ResponseFormat {
        match self.format {
            SparqlFormat::Json => ResponseFormat::Json,
            SparqlFormat::Csv | SparqlFormat::Tsv => ResponseFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Payload;

    fn query(format: SparqlFormat) -> SparqlQuery {
        SparqlQuery {
            endpoint: "https://query.wikidata.org/sparql".to_string(),
            query: "SELECT ?item WHERE { ?item wdt:P31 wd:Q146 } LIMIT 1".to_string(),
            format,
        }
    }

    #[test]
    fn test_accept_follows_format() {
        let csv = query(SparqlFormat::Csv)
            .build(&CallerHeaders::default())
            .unwrap();
        assert_eq!(csv.method, Method::Post);
        assert_eq!(csv.headers.get("accept"), Some("text/csv"));
        assert_eq!(
            csv.headers.get("content-type"),
            Some("application/sparql-query")
        );
        assert!(csv.body.as_deref().unwrap().starts_with("SELECT"));

        let json = query(SparqlFormat::Json)
            .build(&CallerHeaders::default())
            .unwrap();
        assert_eq!(
            json.headers.get("accept"),
            Some("application/sparql-results+json")
        );

        let tsv = query(SparqlFormat::Tsv)
            .build(&CallerHeaders::default())
            .unwrap();
        assert_eq!(tsv.headers.get("accept"), Some("text/tab-separated-values"));
    }

    #[test]
    fn test_empty_query_is_usage_error() {
        let mut empty = query(SparqlFormat::Json);
        empty.query = "  \n".to_string();
        assert!(matches!(
            empty.build(&CallerHeaders::default()),
            Err(WikiError::Usage(_))
        ));
    }

    #[test]
    fn test_csv_passes_through() {
        let adapter = query(SparqlFormat::Csv);
        let payload = adapter.parse("item\nQ1\n".to_string()).unwrap();
        assert_eq!(payload, Payload::Text("item\nQ1\n".to_string()));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<SparqlFormat>().unwrap(), SparqlFormat::Csv);
        assert!("xml".parse::<SparqlFormat>().is_err());
    }
}
