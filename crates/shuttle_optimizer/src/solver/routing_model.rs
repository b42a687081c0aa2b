use crate::{problem::virtual_stop::NodeIdx, solver::solver_error::SolverError};

pub type ArcCallback = Box<dyn Fn(NodeIdx, NodeIdx) -> i64 + Send + Sync>;
pub type UnaryCallback = Box<dyn Fn(NodeIdx) -> i64 + Send + Sync>;

enum Transit {
    Arc(ArcCallback),
    /// Evaluated on the node being left, so the cumul at a node is its
    /// value on arrival and the closing depot carries the route total.
    Unary(UnaryCallback),
}

/// A quantity accumulated along a route, starting at 0 on the depot and
/// bounded per vehicle at every node of the route.
pub struct Dimension {
    name: String,
    transit: Transit,
    vehicle_capacities: Vec<i64>,
}

impl Dimension {
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn transit(&self, from: NodeIdx, to: NodeIdx) -> i64 {
        match &self.transit {
            Transit::Arc(callback) => callback(from, to),
            Transit::Unary(callback) => callback(from),
        }
    }

    pub fn capacity(&self, vehicle: usize) -> i64 {
        self.vehicle_capacities[vehicle]
    }
}

/// Declarative vehicle routing model: nodes, a fleet starting and ending at a
/// single depot, an arc cost and any number of dimensions.
pub struct RoutingModel {
    node_count: usize,
    vehicle_count: usize,
    depot: NodeIdx,
    arc_cost: Option<ArcCallback>,
    dimensions: Vec<Dimension>,
}

impl RoutingModel {
    pub fn new(node_count: usize, vehicle_count: usize, depot: NodeIdx) -> Self {
        Self {
            node_count,
            vehicle_count,
            depot,
            arc_cost: None,
            dimensions: Vec::new(),
        }
    }

    pub fn set_arc_cost_evaluator<F>(&mut self, callback: F)
    where
        F: Fn(NodeIdx, NodeIdx) -> i64 + Send + Sync + 'static,
    {
        self.arc_cost = Some(Box::new(callback));
    }

    /// Adds a dimension with the same bound for every vehicle.
    pub fn add_dimension<F>(&mut self, name: &str, transit: F, capacity: i64) -> usize
    where
        F: Fn(NodeIdx, NodeIdx) -> i64 + Send + Sync + 'static,
    {
        self.dimensions.push(Dimension {
            name: name.to_owned(),
            transit: Transit::Arc(Box::new(transit)),
            vehicle_capacities: vec![capacity; self.vehicle_count],
        });
        self.dimensions.len() - 1
    }

    pub fn add_unary_dimension_with_vehicle_capacity<F>(
        &mut self,
        name: &str,
        transit: F,
        vehicle_capacities: Vec<i64>,
    ) -> usize
    where
        F: Fn(NodeIdx) -> i64 + Send + Sync + 'static,
    {
        self.dimensions.push(Dimension {
            name: name.to_owned(),
            transit: Transit::Unary(Box::new(transit)),
            vehicle_capacities,
        });
        self.dimensions.len() - 1
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    pub fn depot(&self) -> NodeIdx {
        self.depot
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension_index(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().position(|dimension| dimension.name == name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        (0..self.node_count)
            .map(NodeIdx::new)
            .filter(move |&node| node != self.depot)
    }

    #[inline]
    pub fn arc_cost(&self, from: NodeIdx, to: NodeIdx) -> i64 {
        self.arc_cost.as_ref().map_or(0, |callback| callback(from, to))
    }

    /// Cost of a full route, depot included at both ends.
    pub fn route_cost(&self, route: &[NodeIdx]) -> i64 {
        route
            .windows(2)
            .map(|arc| self.arc_cost(arc[0], arc[1]))
            .sum()
    }

    /// Cumulative values of `dimension` at every position of a full route.
    pub fn cumuls(&self, dimension: usize, route: &[NodeIdx]) -> Vec<i64> {
        let dimension = &self.dimensions[dimension];
        let mut cumuls = Vec::with_capacity(route.len());
        let mut value = 0;

        for (position, &node) in route.iter().enumerate() {
            if position > 0 {
                value += dimension.transit(route[position - 1], node);
            }
            cumuls.push(value);
        }

        cumuls
    }

    /// Whether a full route respects every dimension bound for `vehicle`.
    pub fn is_feasible(&self, vehicle: usize, route: &[NodeIdx]) -> bool {
        self.dimensions.iter().all(|dimension| {
            let capacity = dimension.capacity(vehicle);
            let mut value = 0;

            route.windows(2).all(|arc| {
                value += dimension.transit(arc[0], arc[1]);
                value <= capacity
            })
        })
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        if self.vehicle_count == 0 {
            return Err(SolverError::InvalidModel("no vehicles".to_owned()));
        }

        if self.depot.get() >= self.node_count {
            return Err(SolverError::InvalidModel(format!(
                "depot {} is out of range for {} nodes",
                self.depot, self.node_count
            )));
        }

        if let Some(dimension) = self
            .dimensions
            .iter()
            .find(|dimension| dimension.vehicle_capacities.len() != self.vehicle_count)
        {
            return Err(SolverError::InvalidModel(format!(
                "dimension {} has {} vehicle capacities for {} vehicles",
                dimension.name,
                dimension.vehicle_capacities.len(),
                self.vehicle_count
            )));
        }

        Ok(())
    }
}
