// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use rand::Rng;
use vesta_hash::Hash;
use vesta_models::block::Block;
use vesta_models::block_id::BlockId;
use vesta_models::collection::{Collection, CollectionGuarantee};
use vesta_models::node::NodeId;
use vesta_models::transaction::Transaction;

/// Generate a random hash
pub fn random_hash() -> Hash {
    let data: [u8; 32] = rand::thread_rng().gen();
    Hash::compute_from(&data)
}

/// Generate a random node id
pub fn random_node_id() -> NodeId {
    NodeId(random_hash())
}

/// Build a transaction whose content is derived from a seed
pub fn make_transaction(seed: &[u8]) -> Transaction {
    Transaction {
        script: seed.to_vec(),
        arguments: vec![],
        gas_limit: 9999,
    }
}

/// Build a collection of `tx_count` seeded transactions
pub fn make_collection(seed: &[u8], tx_count: usize) -> Collection {
    Collection {
        transactions: (0..tx_count)
            .map(|i| {
                let mut tx_seed = seed.to_vec();
                tx_seed.extend_from_slice(&(i as u64).to_be_bytes());
                make_transaction(&tx_seed)
            })
            .collect(),
    }
}

/// Build the guarantee committing to a collection
pub fn make_guarantee(collection: &Collection, reference_block_id: BlockId) -> CollectionGuarantee {
    CollectionGuarantee {
        collection_id: collection.id(),
        reference_block_id,
    }
}

/// Build a block on top of the given parent
pub fn make_block(parent: &Block, guarantees: Vec<CollectionGuarantee>) -> Block {
    Block::new(
        parent.id(),
        parent.height() + 1,
        parent.header.timestamp + 1_000,
        guarantees,
    )
}

/// Build a root block to bootstrap fixtures from
pub fn make_root_block() -> Block {
    Block::new(BlockId(Hash::compute_from(b"pre_root")), 0, 0, vec![])
}
