//! `Match(pattern, p, reuse)` — if `pattern` matches the node, apply `p` to
//! each bound variable and splice the results back in; otherwise pass through.

use std::fmt;

use indexmap::IndexMap;

use crate::cache::Cache;
use crate::error::Result;
use crate::node::Node;
use crate::pass::Pass;
use crate::pattern::{self, Pattern};

/// A pass gated and targeted by a structural [`Pattern`].
///
/// On a match, `p` runs once per bound variable (not once over the whole
/// node): for the bare `Kind(name)` whole-node form this means `p` runs on
/// the entire matched node and its result replaces it outright; for a
/// pattern with field subpatterns, `p` runs on each bound child and the
/// results are spliced back into their original field positions, leaving
/// unbound fields untouched. Cloning semantics mirror
/// [`crate::combinator::Filter`].
#[derive(Clone)]
pub struct Match<P> {
    pattern: Pattern,
    prototype: P,
    reuse: bool,
    clone: Option<P>,
    cache: Cache,
    verbose: bool,
}

impl<P: Pass + Clone + 'static> Match<P> {
    pub fn new(pattern: Pattern, pass: P, reuse: bool) -> Self {
        Self {
            pattern,
            prototype: pass,
            reuse,
            clone: None,
            cache: Cache::new(),
            verbose: false,
        }
    }

    fn ensure_clone(&mut self) {
        if !self.reuse && self.clone.is_none() {
            let mut clone = self.prototype.clone();
            clone.propagate_cache(&self.cache);
            self.clone = Some(clone);
        }
    }

    fn instance(&mut self) -> &mut P {
        if self.reuse {
            &mut self.prototype
        } else {
            self.ensure_clone();
            self.clone.as_mut().unwrap()
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for Match<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Match(pattern={:?}, pass={:?}, reuse={})",
            self.pattern, self.prototype, self.reuse
        )
    }
}

impl<P: Pass + Clone + 'static> Pass for Match<P> {
    fn invoke(&mut self, node: &Node) -> Result<Node> {
        let result = pattern::match_node(&self.pattern, node);
        if !result.matched {
            return Ok(node.clone());
        }

        if self.verbose {
            tracing::info!(pass = %format!("{:?}", self), node = %node.kind(), "Running");
        }

        let output = if self.pattern.is_whole_bind() {
            let name = self.pattern.bind.as_deref().unwrap();
            let bound = result.variables.get(name).unwrap();
            self.instance().invoke(bound)?
        } else {
            // Only the names bound by a field subpattern (at any depth) matter
            // to `substitute`; a simultaneous whole-node `bind` (if the pattern
            // has one) is irrelevant here and must not be run through the
            // wrapped pass too.
            let mut transformed: IndexMap<String, Node> = IndexMap::new();
            for name in self.pattern.field_bind_names() {
                let value = result.variables.get(name).unwrap();
                transformed.insert(name.to_string(), self.instance().invoke(value)?);
            }
            pattern::substitute(&self.pattern, node, &transformed)?
        };

        if self.verbose {
            tracing::info!(pass = %format!("{:?}", self), node = %output.kind(), "Completed");
        }
        Ok(output)
    }

    fn propagate_cache(&mut self, cache: &Cache) {
        self.cache = cache.clone();
        if self.reuse {
            self.prototype.propagate_cache(cache);
        } else {
            self.ensure_clone();
            if let Some(clone) = &mut self.clone {
                clone.propagate_cache(cache);
            }
        }
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Pass> {
        if self.reuse {
            vec![&mut self.prototype as &mut dyn Pass]
        } else {
            self.clone
                .iter_mut()
                .map(|c| c as &mut dyn Pass)
                .collect()
        }
    }

    fn set_verbose_self(&mut self, state: bool) {
        self.verbose = state;
    }

    fn clone_box(&self) -> Box<dyn Pass> {
        Box::new(self.clone())
    }
}

/// `Match(pattern, p, reuse=false)`.
#[allow(non_snake_case)]
pub fn Match<P: Pass + Clone + 'static>(pattern: Pattern, pass: P) -> self::Match<P> {
    self::Match::new(pattern, pass, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::pattern::FieldPattern;
    use crate::testkit::{MyAdd, MyInt, MySimplify};
    use crate::walk;

    fn folding_add() -> Node {
        Node::record(MyAdd::new(
            Node::record(MyInt::new(Node::int(1))),
            Node::record(MyInt::new(Node::int(2))),
        ))
    }

    #[test]
    fn no_match_passes_the_node_through_unchanged() {
        let mut m = Match(Pattern::kind("MyAdd"), walk::rewrite::Post(MySimplify));
        let leaf = Node::record(MyInt::new(Node::int(5)));
        let result = crate::pass::run(&mut m, &leaf).unwrap();
        assert_eq!(result, leaf);
    }

    #[test]
    fn whole_bind_runs_the_pass_on_the_entire_matched_node() {
        let pattern = Pattern::kind("MyAdd").bind("n");
        let mut m = Match(pattern, walk::rewrite::Post(MySimplify));
        let result = crate::pass::run(&mut m, &folding_add()).unwrap();
        assert_eq!(result, Node::record(MyInt::new(Node::int(3))));
    }

    #[test]
    fn field_subpattern_splices_the_transformed_child_back_in() {
        let pattern = Pattern::kind("MyAdd").field("left", FieldPattern::Bind("x".to_string()));
        let mut m = Match(pattern, walk::rewrite::Post(MySimplify));
        // "left" (a bare MyInt) isn't itself a MyAdd, so MySimplify leaves it
        // unchanged; this exercises splicing back an untouched bound value
        // into its original field position, with "right" left alone.
        let result = crate::pass::run(&mut m, &folding_add()).unwrap();
        assert_eq!(result, folding_add());
    }

    #[test]
    fn a_simultaneous_whole_bind_is_not_run_through_the_wrapped_pass() {
        use std::cell::RefCell;
        use std::rc::Rc;

        use crate::rule::RewriteRule;

        // A pattern can set both a whole-node `bind` and field subpatterns;
        // only the field-bound names are meant for substitution, so the
        // whole-node value must never reach the wrapped pass on this path.
        #[derive(Debug, Clone)]
        struct CountInvocations(Rc<RefCell<usize>>);
        impl RewriteRule for CountInvocations {
            fn generic_map(&mut self, _node: &Node) -> Option<Node> {
                *self.0.borrow_mut() += 1;
                None
            }
        }

        let counter = Rc::new(RefCell::new(0));
        let pattern = Pattern::kind("MyAdd")
            .bind("whole")
            .field("left", FieldPattern::Bind("x".to_string()));
        let mut m = Match(pattern, walk::rewrite::Post(CountInvocations(counter.clone())));
        crate::pass::run(&mut m, &folding_add()).unwrap();
        // `Post` over just "left" (a `MyInt` wrapping one `int` atom) visits
        // 2 structural positions. If the whole matched `MyAdd` node were also
        // run through the pass, its own `Post` walk would visit all 5 of its
        // positions (MyAdd + 2×MyInt + 2×int), bringing this to 7.
        assert_eq!(*counter.borrow(), 2);
    }

    #[test]
    fn field_subpattern_with_non_matching_field_fails_to_match() {
        let pattern = Pattern::kind("MyAdd").field("middle", FieldPattern::Wildcard);
        let mut m = Match(pattern, walk::rewrite::Post(MySimplify));
        let add = folding_add();
        let result = crate::pass::run(&mut m, &add).unwrap();
        assert_eq!(result, add);
    }
}
