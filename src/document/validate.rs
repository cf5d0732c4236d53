use super::*;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("{owner} refers to {kind} {index}, but there are only {len}")]
    DanglingReference {
        owner: String,
        kind: &'static str,
        index: usize,
        len: usize,
    },
    #[error("node {node} has more than one parent")]
    SharedNode { node: usize },
    #[error("node {node} is its own ancestor")]
    Cycle { node: usize },
    #[error("scene {scene} lists node {node} as a root, but it is the child of another node")]
    NotARoot { scene: usize, node: usize },
}

fn check(
    owner: impl FnOnce() -> String,
    kind: &'static str,
    index: usize,
    len: usize,
) -> Result<(), DocumentError> {
    if index < len {
        Ok(())
    } else {
        Err(DocumentError::DanglingReference {
            owner: owner(),
            kind,
            index,
            len,
        })
    }
}

impl Document {
    /// Checks that every index points at something and that the nodes form a forest.
    /// Documents coming out of the parser have been validated already, hand built ones
    /// have not.
    pub fn validate(&self) -> Result<(), DocumentError> {
        self.validate_references()?;
        self.validate_hierarchy()
    }

    fn validate_references(&self) -> Result<(), DocumentError> {
        let nodes = self.nodes.len();
        if let Some(scene) = self.default_scene {
            check(|| "the document".into(), "scene", scene, self.scenes.len())?;
        }
        for (index, scene) in self.scenes.iter().enumerate() {
            for &node in &scene.nodes {
                check(|| format!("scene {index}"), "node", node, nodes)?;
            }
        }
        for (index, node) in self.nodes.iter().enumerate() {
            let owner = || format!("node {index}");
            for &child in &node.children {
                check(owner, "node", child, nodes)?;
            }
            if let Some(mesh) = node.mesh {
                check(owner, "mesh", mesh, self.meshes.len())?;
            }
            if let Some(skin) = node.skin {
                check(owner, "skin", skin, self.skins.len())?;
            }
        }
        for (mesh_index, mesh) in self.meshes.iter().enumerate() {
            for (index, primitive) in mesh.primitives.iter().enumerate() {
                let owner = || format!("mesh {mesh_index} primitive {index}");
                let accessors = primitive
                    .attributes
                    .iter()
                    .map(|attribute| attribute.accessor)
                    .chain(primitive.indices);
                for accessor in accessors {
                    check(owner, "accessor", accessor, self.accessors.len())?;
                }
                if let Some(material) = primitive.material {
                    check(owner, "material", material, self.materials.len())?;
                }
            }
        }
        for (index, material) in self.materials.iter().enumerate() {
            let workflow = material.specular_glossiness.iter().flat_map(|workflow| {
                [
                    &workflow.diffuse_texture,
                    &workflow.specular_glossiness_texture,
                ]
            });
            let views = [
                &material.base_color_texture,
                &material.metallic_roughness_texture,
                &material.normal_texture,
                &material.occlusion_texture,
                &material.emissive_texture,
            ]
            .into_iter()
            .chain(workflow)
            .flatten();
            for view in views {
                check(
                    || format!("material {index}"),
                    "texture",
                    view.texture,
                    self.textures.len(),
                )?;
            }
        }
        for (index, skin) in self.skins.iter().enumerate() {
            let owner = || format!("skin {index}");
            for &joint in &skin.joints {
                check(owner, "node", joint, nodes)?;
            }
            if let Some(accessor) = skin.inverse_bind_matrices {
                check(owner, "accessor", accessor, self.accessors.len())?;
            }
        }
        for (index, accessor) in self.accessors.iter().enumerate() {
            if let Some(view) = accessor.buffer_view {
                check(
                    || format!("accessor {index}"),
                    "buffer view",
                    view,
                    self.buffer_views.len(),
                )?;
            }
        }
        for (index, view) in self.buffer_views.iter().enumerate() {
            check(
                || format!("buffer view {index}"),
                "buffer",
                view.buffer,
                self.buffers.len(),
            )?;
        }
        for (index, texture) in self.textures.iter().enumerate() {
            let owner = || format!("texture {index}");
            if let Some(image) = texture.image {
                check(owner, "image", image, self.images.len())?;
            }
            if let Some(sampler) = texture.sampler {
                check(owner, "sampler", sampler, self.samplers.len())?;
            }
        }
        for (index, image) in self.images.iter().enumerate() {
            if let ImageLocation::View { view, .. } = image.location {
                check(
                    || format!("image {index}"),
                    "buffer view",
                    view,
                    self.buffer_views.len(),
                )?;
            }
        }
        Ok(())
    }

    fn validate_hierarchy(&self) -> Result<(), DocumentError> {
        let mut parents = vec![None; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                if parents[child].replace(index).is_some() {
                    return Err(DocumentError::SharedNode { node: child });
                }
            }
        }

        // With at most one parent per node, walking up either ends at a root or loops.
        for node in 0..self.nodes.len() {
            let mut current = parents[node];
            let mut steps = 0;
            while let Some(parent) = current {
                if parent == node || steps > self.nodes.len() {
                    return Err(DocumentError::Cycle { node });
                }
                current = parents[parent];
                steps += 1;
            }
        }

        for (index, scene) in self.scenes.iter().enumerate() {
            if let Some(&node) = scene.nodes.iter().find(|node| parents[**node].is_some()) {
                return Err(DocumentError::NotARoot { scene: index, node });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent_of(children: Vec<usize>) -> Node {
        Node {
            children,
            ..Default::default()
        }
    }

    #[test]
    fn dangling_mesh_is_rejected() {
        let document = Document {
            nodes: vec![Node {
                mesh: Some(3),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(
            document.validate(),
            Err(DocumentError::DanglingReference {
                owner: "node 0".into(),
                kind: "mesh",
                index: 3,
                len: 0,
            })
        );
    }

    #[test]
    fn shared_child_is_rejected() {
        let document = Document {
            nodes: vec![parent_of(vec![2]), parent_of(vec![2]), Node::default()],
            ..Default::default()
        };
        assert_eq!(
            document.validate(),
            Err(DocumentError::SharedNode { node: 2 })
        );
    }

    #[test]
    fn cycle_is_rejected() {
        let document = Document {
            nodes: vec![parent_of(vec![1]), parent_of(vec![2]), parent_of(vec![0])],
            ..Default::default()
        };
        assert!(matches!(
            document.validate(),
            Err(DocumentError::Cycle { .. })
        ));
    }

    #[test]
    fn scene_roots_must_be_roots() {
        let document = Document {
            scenes: vec![Scene {
                name: None,
                nodes: vec![0, 1],
            }],
            nodes: vec![parent_of(vec![1]), Node::default()],
            ..Default::default()
        };
        assert_eq!(
            document.validate(),
            Err(DocumentError::NotARoot { scene: 0, node: 1 })
        );
    }

    #[test]
    fn forest_is_accepted() {
        let document = Document {
            scenes: vec![Scene {
                name: None,
                nodes: vec![0, 3],
            }],
            nodes: vec![
                parent_of(vec![1, 2]),
                Node::default(),
                Node::default(),
                Node::default(),
            ],
            ..Default::default()
        };
        assert_eq!(document.validate(), Ok(()));
    }
}
