// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use vesta_models::collection::CollectionId;
use vesta_models::node::NodeId;

/// The network requester capability used to fetch missing collections.
///
/// Requests are asynchronous: the fetched entities come back through the
/// `IngestionController::on_collection` callback, with the requester's own
/// retry and timeout policy applied in between.
pub trait CollectionRequester: Send + Sync {
    /// Queue a fetch for a collection, restricting delivery to the given
    /// guarantor peers
    fn request_collection(&self, collection_id: CollectionId, guarantors: Vec<NodeId>);

    /// Trigger immediate dispatch of all queued requests
    fn force(&self);
}
