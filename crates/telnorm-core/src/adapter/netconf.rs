//! NETCONF reply adapter.

use crate::error::DocumentError;
use crate::resolve::XmlDocument;

/// Parses a NETCONF reply and scopes it to its payload.
///
/// `<rpc-reply><data>…</data></rpc-reply>` is scoped to `data`; an
/// `<rpc-error>` becomes [`DocumentError::RpcError`]; anything else keeps the
/// root element as scope.
pub fn parse_reply(text: &str) -> Result<XmlDocument<'_>, DocumentError> {
    let mut doc = XmlDocument::parse(text)?;

    let root = doc.tree().root_element();
    if root.tag_name().name() != "rpc-reply" {
        return Ok(doc);
    }

    if let Some(error) = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "rpc-error")
    {
        let message = ["error-message", "error-tag"]
            .iter()
            .find_map(|name| {
                error
                    .descendants()
                    .find(|n| n.tag_name().name() == *name)
                    .and_then(|n| n.text())
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
            })
            .unwrap_or("unspecified error")
            .to_string();
        return Err(DocumentError::RpcError(message));
    }

    let data = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "data")
        .map(|n| n.id());
    if let Some(id) = data {
        doc.rescope(id);
    }
    Ok(doc)
}
