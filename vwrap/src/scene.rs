use std::collections::{hash_map::Entry, HashMap};

use vwrap_remote::{ObjectType, OpMode, RemoteApi};

use crate::{
    error::{Error, RemoteError},
    joint::Joint,
    session::Session,
};

/// Handles to the joints of the loaded scene.
///
/// The name→handle table is built once, by a single blocking enumeration
/// when the scene is constructed; joints added to the scene afterwards are
/// not visible.
pub struct Scene<A: RemoteApi> {
    api: A,
    client_id: i32,
    handles: HashMap<String, i32>,
    joints: HashMap<String, Joint<A>>,
}

impl<A: RemoteApi + Clone> Scene<A> {
    /// Enumerates the joints of the scene the session is connected to.
    pub fn new(session: &Session<A>) -> Result<Self, Error> {
        let client_id = session.client_id();
        let (code, objects) =
            session
                .api()
                .object_group_data(client_id, ObjectType::Joint, OpMode::Blocking);
        RemoteError::check(code)?;
        tracing::debug!("Scene enumeration found {} joints", objects.len());

        Ok(Self {
            api: session.api().clone(),
            client_id,
            handles: objects.into_iter().collect(),
            joints: HashMap::new(),
        })
    }

    /// Returns the joint with the given scene name, constructing it on first
    /// access.
    ///
    /// Repeated calls hand back the same instance, so local joint state such
    /// as the control mode stays consistent across lookups.
    pub fn joint(&mut self, name: &str) -> Result<&mut Joint<A>, Error> {
        match self.joints.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let handle = *self
                    .handles
                    .get(name)
                    .ok_or_else(|| Error::UnknownJoint(name.to_string()))?;
                let joint = Joint::new(self.api.clone(), self.client_id, name.to_string(), handle)?;
                Ok(entry.insert(joint))
            }
        }
    }

    /// Names of the joints in the scene, in no particular order.
    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }

    /// Whether the scene contains a joint with this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handles.contains_key(name)
    }

    /// Number of joints in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the scene has no joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use vwrap_emulator::Emulator;
    use vwrap_remote::ReturnCode;

    use super::*;
    use crate::tests::connect;

    #[test]
    fn enumeration_builds_the_handle_table() {
        let emulator = Emulator::new();
        let arm = emulator.add_joint("arm", 0.0, true);
        let wrist = emulator.add_joint("wrist", 0.5, false);

        let session = connect(&emulator);
        let mut scene = Scene::new(&session).unwrap();

        assert_eq!(2, scene.len());
        assert!(!scene.is_empty());
        assert!(scene.contains("arm"));
        assert!(scene.contains("wrist"));
        assert_eq!(arm, scene.joint("arm").unwrap().handle());
        assert_eq!(wrist, scene.joint("wrist").unwrap().handle());
    }

    #[test]
    fn unknown_name_is_a_lookup_error() {
        let emulator = Emulator::new();
        emulator.add_joint("arm", 0.0, true);

        let session = connect(&emulator);
        let mut scene = Scene::new(&session).unwrap();

        assert!(matches!(
            scene.joint("elbow"),
            Err(Error::UnknownJoint(name)) if name == "elbow"
        ));
    }

    #[test]
    fn repeated_lookups_share_one_joint() {
        let emulator = Emulator::new();
        emulator.add_joint("arm", 0.0, true);

        let session = connect(&emulator);
        let mut scene = Scene::new(&session).unwrap();

        scene.joint("arm").unwrap().set_position_controlled(false);
        assert!(!scene.joint("arm").unwrap().position_controlled());
    }

    #[test]
    fn failed_enumeration_is_an_error() {
        let emulator = Emulator::new();
        let session = connect(&emulator);

        emulator.fail_next(ReturnCode::REMOTE_ERROR);
        assert!(matches!(
            Scene::new(&session),
            Err(Error::Remote(crate::RemoteError::ServerError))
        ));
    }
}
