use serde::Serialize;

/// Turn a descriptor handle (and every handle nested in it) into its plain
/// form: a tree of JSON objects, each tagged with its variant under `type`
///
/// The plain form can be read back with the `from_plain` constructor of the
/// corresponding handle, e.g. [VirtualDocument::from_plain](crate::VirtualDocument::from_plain).
/// Memoized resolutions are not part of the plain form.
pub fn serialise<T>(handle: &T) -> serde_json::Result<serde_json::Value>
where
    T: Serialize,
{
    serde_json::to_value(handle)
}

#[cfg(test)]
mod tests {
    use plandoc_pod::{MemoryPod, vocab};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{ConfiguresAcl, VirtualContainer, VirtualDocument, VirtualSubject};

    #[test]
    fn it_serialises_nested_descriptors() -> anyhow::Result<()> {
        let profile = VirtualDocument::<MemoryPod>::found_at("https://some.pod/profile.ttl");
        let me = VirtualSubject::found_in(&profile).with_ref(vocab::RDF_TYPE, vocab::FOAF_AGENT);
        let root = VirtualContainer::found_at("https://some.pod/");
        let notes = VirtualDocument::ensured_on(
            &me,
            "https://vocab.example/notes",
            &VirtualContainer::contained_in(&root, "notes"),
        )
        .is_readable_by_everyone();

        assert_eq!(
            serialise(&notes)?,
            json!({
                "type": "EnsuredOn",
                "subject": {
                    "type": "FoundIn",
                    "document": {
                        "type": "FoundAt",
                        "reference": "https://some.pod/profile.ttl"
                    },
                    "locator": {
                        "references": [
                            { "predicate": vocab::RDF_TYPE, "object": vocab::FOAF_AGENT }
                        ]
                    }
                },
                "predicate": "https://vocab.example/notes",
                "fallbackContainer": {
                    "type": "ContainedIn",
                    "container": { "type": "FoundAt", "reference": "https://some.pod/" },
                    "name": "notes",
                    "acl": {}
                },
                "acl": { "public": { "read": true } }
            })
        );
        Ok(())
    }

    #[test]
    fn it_reads_back_what_it_serialised() -> anyhow::Result<()> {
        let profile = VirtualDocument::<MemoryPod>::found_at("https://some.pod/profile.ttl");
        let me = VirtualSubject::ensured_in(&profile).as_ref("#me");

        let plain = serialise(&me)?;
        let read = VirtualSubject::<MemoryPod>::from_plain(plain.clone())?;

        assert_eq!(serialise(&read)?, plain);
        assert!(!read.ptr_eq(&me));
        Ok(())
    }
}
