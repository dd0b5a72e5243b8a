pub use crate::config::*;

/// A builder for assembling an election.
///
/// Lists keep the order in which they are added, and candidates keep the
/// order in which they are added to their list.
///
/// ```
/// pub use works_council::builder::ElectionBuilder;
/// pub use works_council::{Gender, Workforce};
/// # use works_council::ElectionErrors;
///
/// let workforce = Workforce { men: 30, women: 20, non_binary: 0 };
/// let mut builder = ElectionBuilder::new(workforce)
///     .list("BR", "Brolidarity", 5)?
///     .list("SO", "Solidarity", 3)?;
///
/// builder.add_candidate("BR", "BR.1", Gender::Man)?;
/// builder.add_candidate("SO", "SO.1", Gender::Woman)?;
///
/// let election = builder.build();
/// let outcome = works_council::run_election(&election)?;
/// assert_eq!(outcome.works_council_size, 3);
///
/// # Ok::<(), ElectionErrors>(())
/// ```
pub struct ElectionBuilder {
    pub(crate) _workforce: Workforce,
    pub(crate) _lists: Vec<CandidateList>,
}

impl ElectionBuilder {
    pub fn new(workforce: Workforce) -> ElectionBuilder {
        ElectionBuilder {
            _workforce: workforce,
            _lists: Vec::new(),
        }
    }

    /// Adds an empty list.
    pub fn list(self, id: &str, name: &str, votes: u64) -> Result<ElectionBuilder, ElectionErrors> {
        if self._lists.iter().any(|l| l.id == id) {
            return Err(ElectionErrors::DuplicateList(id.to_string()));
        }
        let mut lists = self._lists;
        lists.push(CandidateList::new(id, name, votes));
        Ok(ElectionBuilder {
            _workforce: self._workforce,
            _lists: lists,
        })
    }

    /// Adds a candidate at the bottom of the given list.
    pub fn add_candidate(
        &mut self,
        list_id: &str,
        candidate_id: &str,
        gender: Gender,
    ) -> Result<(), ElectionErrors> {
        let list = self
            ._lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| ElectionErrors::UnknownList(list_id.to_string()))?;
        list.push_candidate(candidate_id, gender)
    }

    pub fn build(self) -> Election {
        Election {
            workforce: self._workforce,
            lists: self._lists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicates() {
        let builder = ElectionBuilder::new(Workforce::default())
            .list("A", "Alpha", 1)
            .unwrap();
        assert_eq!(
            builder.list("A", "Again", 2).err(),
            Some(ElectionErrors::DuplicateList("A".to_string()))
        );

        let mut builder = ElectionBuilder::new(Workforce::default())
            .list("A", "Alpha", 1)
            .unwrap();
        builder.add_candidate("A", "A.1", Gender::Man).unwrap();
        assert_eq!(
            builder.add_candidate("A", "A.1", Gender::Woman),
            Err(ElectionErrors::DuplicateCandidate {
                list: "A".to_string(),
                candidate: "A.1".to_string()
            })
        );
        assert_eq!(
            builder.add_candidate("B", "B.1", Gender::Woman),
            Err(ElectionErrors::UnknownList("B".to_string()))
        );
    }

    #[test]
    fn keeps_insertion_order() {
        let mut builder = ElectionBuilder::new(Workforce::default())
            .list("Z", "Zulu", 1)
            .unwrap()
            .list("A", "Alpha", 9)
            .unwrap();
        builder.add_candidate("A", "A.2", Gender::Woman).unwrap();
        builder.add_candidate("A", "A.1", Gender::Man).unwrap();
        let election = builder.build();
        let ids: Vec<&str> = election.lists.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["Z", "A"]);
        let members: Vec<&str> = election.lists[1]
            .members
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(members, vec!["A.2", "A.1"]);
    }

    #[test]
    fn edit_list_before_tally() {
        let mut l = CandidateList::new("A", "Alpha", 4);
        for (id, g) in [("A.1", Gender::Man), ("A.2", Gender::Man), ("A.3", Gender::Woman)] {
            l.push_candidate(id, g).unwrap();
        }
        l.move_candidate(2, 0).unwrap();
        let ids: Vec<&str> = l.members.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A.3", "A.1", "A.2"]);

        assert!(l.move_candidate(0, 3).is_err());
        assert_eq!(l.remove_candidate("A.1").map(|c| c.gender), Some(Gender::Man));
        assert_eq!(l.remove_candidate("A.1"), None);

        l.set_gender("A.2", Gender::NonBinary).unwrap();
        assert_eq!(l.members[1].gender, Gender::NonBinary);
        assert!(l.set_gender("A.9", Gender::Man).is_err());
    }
}
