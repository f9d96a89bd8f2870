use lopdf::{Dictionary, Document, Object, ObjectId};

/// Enumerates the image XObjects referenced by a page.
///
/// Each page's `/Resources` dictionary (own or inherited from the page tree)
/// may carry an `/XObject` sub-dictionary mapping resource names to streams.
/// Entries whose `/Subtype` is `/Image` are yielded in the dictionary's
/// declared order, which is the order this crate assigns in-page indices by.
pub(crate) struct ImageRefDiscovery<'a> {
    document: &'a Document,
}

/// Page-tree /Parent chains are short in practice; this only guards against
/// cyclic documents.
const MAX_PARENT_DEPTH: usize = 32;

impl<'a> ImageRefDiscovery<'a> {
    pub(crate) fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Return `(resource_name, object_id)` for every image XObject on the
    /// page, in declared order. A page with no resources or no image
    /// XObjects yields an empty list.
    pub(crate) fn images_on_page(&self, page_id: ObjectId) -> Vec<(String, ObjectId)> {
        let resources = match self.page_resources(page_id) {
            Some(dict) => dict,
            None => return Vec::new(),
        };

        let xobjects = match resources
            .get(b"XObject")
            .ok()
            .and_then(|v| self.resolve_dict(v))
        {
            Some(dict) => dict,
            None => return Vec::new(),
        };

        let mut images = Vec::new();
        for (name, value) in xobjects.iter() {
            if let Ok(object_id) = value.as_reference() {
                if self.is_image_stream(object_id) {
                    images.push((String::from_utf8_lossy(name).into_owned(), object_id));
                }
            }
        }
        images
    }

    /// Returns `true` when the object is a stream with `/Subtype /Image`.
    fn is_image_stream(&self, object_id: ObjectId) -> bool {
        let Ok(object) = self.document.get_object(object_id) else {
            return false;
        };
        let Ok(stream) = object.as_stream() else {
            return false;
        };
        stream
            .dict
            .get(b"Subtype")
            .and_then(|v| v.as_name())
            .map(|n| n == b"Image")
            .unwrap_or(false)
    }

    /// Find the page's `/Resources` dictionary, walking `/Parent` links when
    /// the page inherits resources from the page tree.
    fn page_resources(&self, page_id: ObjectId) -> Option<Dictionary> {
        let mut dict = self
            .document
            .get_object(page_id)
            .ok()?
            .as_dict()
            .ok()?
            .clone();

        for _ in 0..MAX_PARENT_DEPTH {
            if let Ok(resources) = dict.get(b"Resources") {
                return self.resolve_dict(resources);
            }
            let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self
                .document
                .get_object(parent_id)
                .ok()?
                .as_dict()
                .ok()?
                .clone();
        }
        None
    }

    /// Resolve a value that might be inline or a reference to a dictionary.
    fn resolve_dict(&self, value: &Object) -> Option<Dictionary> {
        if let Ok(id) = value.as_reference() {
            self.document
                .get_object(id)
                .ok()
                .and_then(|o| o.as_dict().ok().cloned())
        } else {
            value.as_dict().ok().cloned()
        }
    }
}
