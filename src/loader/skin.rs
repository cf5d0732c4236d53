use std::collections::HashMap;

use asset_common::Entity;

use crate::{asset::Skin, document::Document, error::ImportError};

/// Resolves joints and targets once the whole hierarchy exists.
pub(crate) fn import_skins(
    document: &Document,
    node_map: &HashMap<usize, Entity>,
) -> Result<Vec<Skin>, ImportError> {
    let mut skins = document
        .skins
        .iter()
        .enumerate()
        .map(|(index, skin)| {
            let joints = skin
                .joints
                .iter()
                .map(|&node| {
                    node_map
                        .get(&node)
                        .copied()
                        .ok_or(ImportError::UnresolvedJoint { skin: index, node })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Skin {
                name: skin.name.clone(),
                joints,
                targets: Vec::new(),
                inverse_bind_matrices: skin.inverse_bind_matrices,
            })
        })
        .collect::<Result<Vec<_>, ImportError>>()?;

    for (index, node) in document.nodes.iter().enumerate() {
        // Nodes outside the imported scene have no entity.
        if let (Some(skin), Some(&entity)) = (node.skin, node_map.get(&index)) {
            skins[skin].targets.push(entity);
        }
    }
    Ok(skins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{self, Node};

    #[test]
    fn joints_keep_their_declared_order() {
        let document = Document {
            nodes: vec![
                Node {
                    skin: Some(0),
                    ..Default::default()
                },
                Node::default(),
                Node::default(),
            ],
            skins: vec![document::Skin {
                name: Some("rig".into()),
                joints: vec![2, 1],
                inverse_bind_matrices: Some(5),
            }],
            ..Default::default()
        };
        let node_map = (0..3).map(|node| (node, Entity::new(10 + node as u32))).collect();

        let skins = import_skins(&document, &node_map).unwrap();
        assert_eq!(skins[0].joints, vec![Entity::new(12), Entity::new(11)]);
        assert_eq!(skins[0].targets, vec![Entity::new(10)]);
        assert_eq!(skins[0].inverse_bind_matrices, Some(5));
    }

    #[test]
    fn missing_joint_is_an_error() {
        let document = Document {
            nodes: vec![Node::default(), Node::default()],
            skins: vec![document::Skin {
                joints: vec![1],
                ..Default::default()
            }],
            ..Default::default()
        };
        let node_map = HashMap::from([(0, Entity::new(1))]);
        assert!(matches!(
            import_skins(&document, &node_map),
            Err(ImportError::UnresolvedJoint { skin: 0, node: 1 })
        ));
    }
}
